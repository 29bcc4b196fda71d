//! Configuration schema for offline-bundle
//!
//! Configuration is stored at `~/.config/offline-bundle/config.toml`

use crate::fetch::DEFAULT_MAX_BODY_BYTES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Deployment being cached
    pub deployment: DeploymentConfig,

    /// Cache build settings
    pub build: BuildConfig,

    /// Background update settings
    pub update: UpdateConfig,

    /// Cache store settings
    pub store: StoreConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Deployment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Scope URL the bundle is served under (required)
    pub scope: Option<String>,

    /// Prefix for cache names
    pub cache_prefix: String,

    /// Manifest path, relative to the scope
    pub manifest: String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            scope: None,
            cache_prefix: "offline".to_string(),
            manifest: "offline.js".to_string(),
        }
    }
}

/// Build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Pause between fetching and publishing a version, in milliseconds
    pub grace_period_ms: u64,

    /// Per-request network timeout in seconds
    pub fetch_timeout_secs: u64,

    /// Largest response body accepted from the network, in bytes
    pub max_body_bytes: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 1000,
            fetch_timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Update check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Interval between checks in `watch` mode, in seconds
    pub interval_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

/// Store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store directory (defaults to the state directory)
    pub dir: Option<PathBuf>,
}
