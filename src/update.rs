//! Activation and background update checks
//!
//! Both flows fetch the manifest, put the main page at the front of its
//! file list and hand it to the builder. Neither ever touches an existing
//! cache or session binding: a new manifest version becomes a new,
//! separate cache that only future page loads will pick up.

use crate::cache::{BuildKind, CacheBuilder, Manifest, ManifestSource, VersionLocator, VersionedCache};
use crate::error::OfflineResult;
use crate::scope::Scope;
use crate::session::ClientRegistry;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Shortest interval accepted by `watch`
const MIN_WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of one update check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// A cache for the manifest version already exists
    UpToDate(u64),
    /// A new version was built and published
    Updated(u64),
    /// The check failed; details were logged
    Failed,
}

/// Drives first-load and update builds
#[derive(Clone)]
pub struct UpdateCoordinator {
    scope: Scope,
    manifests: ManifestSource,
    builder: CacheBuilder,
    locator: VersionLocator,
}

impl UpdateCoordinator {
    pub fn new(
        scope: Scope,
        manifests: ManifestSource,
        builder: CacheBuilder,
        locator: VersionLocator,
    ) -> Self {
        Self {
            scope,
            manifests,
            builder,
            locator,
        }
    }

    /// First load: cache the current manifest plus the main page.
    ///
    /// Errors are logged and swallowed; activation never fails the host.
    pub async fn activate(&self, clients: &dyn ClientRegistry) -> Option<VersionedCache> {
        match self.try_activate(clients).await {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Error activating: {}", e);
                None
            }
        }
    }

    /// First load, returning the error instead of logging it
    pub async fn try_activate(&self, clients: &dyn ClientRegistry) -> OfflineResult<VersionedCache> {
        let main_page = clients
            .main_page_url()
            .await
            .map(|url| self.scope.normalize_main_page(&url))
            .unwrap_or_default();
        info!("Main page URL: {}", main_page);

        let manifest = self.fetch_manifest(&main_page).await?;
        info!("Requesting {} files to cache", manifest.files.len());
        self.builder.build(&manifest, BuildKind::FirstLoad).await
    }

    /// Build the manifest's version if it has not been built yet.
    ///
    /// Failures are logged and reported as `UpdateStatus::Failed`; they never
    /// reach the request that triggered the check.
    pub async fn check_for_update(&self, main_resource: &str) -> UpdateStatus {
        match self.try_check_for_update(main_resource).await {
            Ok(status) => status,
            Err(e) => {
                error!("Error checking for update: {}", e);
                UpdateStatus::Failed
            }
        }
    }

    /// Update check, returning the error instead of logging it
    pub async fn try_check_for_update(&self, main_resource: &str) -> OfflineResult<UpdateStatus> {
        let main_page = self.scope.normalize_main_page(main_resource);
        info!("Checking for update (main page URL = {})", main_page);

        let manifest = self.fetch_manifest(&main_page).await?;
        if self.locator.exists(manifest.version).await? {
            info!("Up-to-date at version {}", manifest.version);
            return Ok(UpdateStatus::UpToDate(manifest.version));
        }

        info!("New version {} available", manifest.version);
        let cache = self.builder.build(&manifest, BuildKind::Update).await?;
        Ok(UpdateStatus::Updated(cache.version()))
    }

    /// Run update checks on a fixed interval, forever.
    ///
    /// The first check runs immediately. Callers stop the loop by dropping
    /// the future, e.g. from a `tokio::select!` against a shutdown signal.
    pub async fn watch(&self, main_resource: &str, every: Duration) {
        let mut ticker = interval(every.max(MIN_WATCH_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let status = self.check_for_update(main_resource).await;
            debug!("Scheduled update check finished: {:?}", status);
        }
    }

    async fn fetch_manifest(&self, main_page: &str) -> OfflineResult<Manifest> {
        let manifest = self.manifests.fetch().await?;
        info!("Fetched manifest, version = {}", manifest.version);
        Ok(manifest.with_main_page(main_page))
    }
}
