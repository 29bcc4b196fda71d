//! Bundle manifest
//!
//! The manifest is a JSON document `{ "version": N, "files": [...] }`
//! served from a fixed address under the scope. It is always fetched
//! fresh: a random query parameter plus `no-store` keeps every cache
//! layer out of the way.

use crate::error::{OfflineError, OfflineResult};
use crate::fetch::{CacheMode, FetchOptions, Fetcher};
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Versioned list of files making up the bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u64,
    pub files: Vec<String>,
}

impl Manifest {
    pub fn new(version: u64, files: Vec<String>) -> Self {
        Self { version, files }
    }

    /// Put the main page at the start of the file list.
    ///
    /// An empty page (no client known) leaves the list unchanged.
    pub fn with_main_page(mut self, page: &str) -> Self {
        if !page.is_empty() {
            self.files.insert(0, page.to_string());
        }
        self
    }
}

/// Fetches the manifest for one deployment
#[derive(Clone)]
pub struct ManifestSource {
    fetcher: Arc<dyn Fetcher>,
    scope: Scope,
    path: String,
}

impl ManifestSource {
    pub fn new(fetcher: Arc<dyn Fetcher>, scope: Scope, path: impl Into<String>) -> Self {
        Self {
            fetcher,
            scope,
            path: path.into(),
        }
    }

    /// Absolute manifest address without the cache-buster
    pub fn url(&self) -> OfflineResult<String> {
        self.scope.resolve(&self.path)
    }

    /// Fetch and decode the current manifest
    pub async fn fetch(&self) -> OfflineResult<Manifest> {
        let base = self.url()?;
        let separator = if base.contains('?') { '&' } else { '?' };
        let url = format!("{}{}r={}", base, separator, Uuid::new_v4().simple());

        debug!("Fetching manifest {}", url);
        let response = self
            .fetcher
            .fetch(&url, FetchOptions::with_cache(CacheMode::NoStore))
            .await
            .map_err(|e| OfflineError::manifest(&base, e))?;

        if !response.is_ok() {
            return Err(OfflineError::manifest(
                &base,
                format!("HTTP status {}", response.status),
            ));
        }

        response
            .json::<Manifest>()
            .map_err(|e| OfflineError::manifest(&base, e))
    }
}
