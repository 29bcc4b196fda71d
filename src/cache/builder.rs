//! Publishing a manifest as a new cache version
//!
//! Every file is fetched before anything is written. If any fetch fails the
//! build aborts with `IncompleteFetchSet` and the store is left untouched,
//! so a version either exists with its complete file set or not at all.

use crate::cache::key::{CacheNaming, VersionedCache};
use crate::cache::manifest::Manifest;
use crate::error::{OfflineError, OfflineResult};
use crate::fetch::{CacheMode, FetchOptions, Fetcher, Response};
use crate::scope::Scope;
use crate::store::CacheStore;
use futures_util::future::{join_all, try_join_all};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default pause between a successful fetch phase and publishing
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(1000);

/// Why a build is running; decides how fetches treat transport caches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    /// Activation build. Transport caches may deduplicate in-flight requests.
    FirstLoad,
    /// Background update. Transport caches are bypassed.
    Update,
}

impl BuildKind {
    pub fn cache_mode(&self) -> CacheMode {
        match self {
            Self::FirstLoad => CacheMode::Default,
            Self::Update => CacheMode::Reload,
        }
    }
}

/// Fetches a manifest's files and publishes them as one version
#[derive(Clone)]
pub struct CacheBuilder {
    store: Arc<dyn CacheStore>,
    fetcher: Arc<dyn Fetcher>,
    scope: Scope,
    naming: CacheNaming,
    grace_period: Duration,
}

impl CacheBuilder {
    pub fn new(
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        scope: Scope,
        naming: CacheNaming,
    ) -> Self {
        Self {
            store,
            fetcher,
            scope,
            naming,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    /// Override the pause taken before publishing.
    ///
    /// The pause gives the first sub-resource request of a page load a
    /// chance to pin its session before a newer version appears. It narrows
    /// the race, it does not close it.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Build and publish the cache for `manifest.version`
    pub async fn build(&self, manifest: &Manifest, kind: BuildKind) -> OfflineResult<VersionedCache> {
        let requests = manifest
            .files
            .iter()
            .map(|file| self.scope.resolve(file))
            .collect::<OfflineResult<Vec<String>>>()?;

        info!(
            "Fetching {} files for version {}",
            requests.len(),
            manifest.version
        );
        let options = FetchOptions::with_cache(kind.cache_mode());
        let results = join_all(
            requests
                .iter()
                .map(|url| self.fetcher.fetch(url, options)),
        )
        .await;

        let responses = Self::verify(manifest.version, &requests, results)?;
        debug!("Fetched all files for version {}", manifest.version);

        if !self.grace_period.is_zero() {
            tokio::time::sleep(self.grace_period).await;
        }

        let key = self.naming.key(manifest.version);
        info!("Writing {} entries to cache '{}'", responses.len(), key);
        let handle = self.store.open(&key.name()).await?;
        try_join_all(
            requests
                .iter()
                .zip(&responses)
                .map(|(request, response)| handle.put(request, response)),
        )
        .await?;

        info!("Cache '{}' ready for offline use", key);
        Ok(VersionedCache::new(key, handle))
    }

    /// Require one successful response per requested file
    fn verify(
        version: u64,
        requests: &[String],
        results: Vec<OfflineResult<Response>>,
    ) -> OfflineResult<Vec<Response>> {
        let expected = requests.len();
        let mut responses = Vec::with_capacity(expected);
        let mut failed = Vec::new();

        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(response) if response.is_ok() => responses.push(response),
                Ok(response) => {
                    debug!("{} returned status {}", request, response.status);
                    failed.push(format!("{} ({})", request, response.status));
                }
                Err(e) => {
                    debug!("{} failed: {}", request, e);
                    failed.push(request.clone());
                }
            }
        }

        if responses.len() != expected || !failed.is_empty() {
            return Err(OfflineError::IncompleteFetchSet {
                version,
                expected,
                received: responses.len(),
                failed,
            });
        }

        Ok(responses)
    }
}
