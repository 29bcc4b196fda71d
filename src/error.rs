//! Error types for offline-bundle
//!
//! All modules use `OfflineResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for offline-bundle operations
pub type OfflineResult<T> = Result<T, OfflineError>;

/// All errors that can occur while building, locating or serving caches
#[derive(Error, Debug)]
pub enum OfflineError {
    // Build errors
    #[error("Incomplete fetch set for version {version}: {received}/{expected} files fetched, failed: {}", failed.join(", "))]
    IncompleteFetchSet {
        version: u64,
        expected: usize,
        received: usize,
        failed: Vec<String>,
    },

    // Manifest errors
    #[error("Failed to fetch manifest {url}: {reason}")]
    ManifestFetch { url: String, reason: String },

    // Network errors
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Invalid deployment scope '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },

    #[error("Cannot resolve '{id}' against scope: {reason}")]
    InvalidResource { id: String, reason: String },

    // Store errors
    #[error("Cache store error: {context}")]
    Store {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache store is inconsistent: {0}")]
    StoreOperation(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No deployment scope configured")]
    ScopeNotConfigured,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OfflineError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a network fetch error
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a manifest fetch error
    pub fn manifest(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ManifestFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IncompleteFetchSet { .. } | Self::ManifestFetch { .. } | Self::Fetch { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ScopeNotConfigured => {
                Some("Pass --scope <URL> or set deployment.scope in config.toml")
            }
            Self::InvalidScope { .. } => Some("The scope must be an absolute URL, e.g. https://example.com/app/"),
            Self::ManifestFetch { .. } => Some("Check that the manifest is reachable under the scope"),
            Self::IncompleteFetchSet { .. } => {
                Some("Nothing was cached; the next update check will retry")
            }
            _ => None,
        }
    }
}
