//! Component factory
//!
//! Wires a store and a fetcher into the full set of lifecycle components
//! for one deployment scope.

use crate::cache::{
    CacheBuilder, CacheNaming, GarbageCollector, ManifestSource, VersionLocator,
};
use crate::config::{Config, ConfigManager};
use crate::error::{OfflineError, OfflineResult};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::router::OfflineRouter;
use crate::scope::Scope;
use crate::session::SessionCacheBinder;
use crate::store::{CacheStore, DiskStore};
use crate::update::UpdateCoordinator;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Every lifecycle component for one deployment
pub struct OfflineBundle {
    pub scope: Scope,
    pub store: Arc<dyn CacheStore>,
    pub locator: VersionLocator,
    pub gc: GarbageCollector,
    pub updater: Arc<UpdateCoordinator>,
    pub router: OfflineRouter,
}

impl OfflineBundle {
    /// Assemble components from explicit collaborators
    pub fn assemble(
        scope: Scope,
        store: Arc<dyn CacheStore>,
        fetcher: Arc<dyn Fetcher>,
        config: &Config,
    ) -> Self {
        let naming = CacheNaming::new(&config.deployment.cache_prefix, &scope);
        let locator = VersionLocator::new(store.clone(), naming.clone());
        let builder = CacheBuilder::new(store.clone(), fetcher.clone(), scope.clone(), naming)
            .with_grace_period(Duration::from_millis(config.build.grace_period_ms));
        let manifests =
            ManifestSource::new(fetcher.clone(), scope.clone(), &config.deployment.manifest);
        let updater = Arc::new(UpdateCoordinator::new(
            scope.clone(),
            manifests,
            builder,
            locator.clone(),
        ));
        let gc = GarbageCollector::new(locator.clone());
        let router = OfflineRouter::new(
            scope.clone(),
            fetcher,
            SessionCacheBinder::new(locator.clone()),
            gc.clone(),
            updater.clone(),
        );

        Self {
            scope,
            store,
            locator,
            gc,
            updater,
            router,
        }
    }
}

/// Resolve the deployment scope, preferring an explicit override
pub fn resolve_scope(config: &Config, override_scope: Option<&str>) -> OfflineResult<Scope> {
    let raw = override_scope
        .or(config.deployment.scope.as_deref())
        .ok_or(OfflineError::ScopeNotConfigured)?;
    Scope::parse(raw)
}

/// Create the disk store and HTTP fetcher described by `config`
pub fn create_bundle(config: &Config, override_scope: Option<&str>) -> OfflineResult<OfflineBundle> {
    let scope = resolve_scope(config, override_scope)?;
    let store_dir = ConfigManager::store_dir(config);
    debug!("Using cache store at {}", store_dir.display());

    let store: Arc<dyn CacheStore> = Arc::new(DiskStore::new(store_dir));
    let fetcher: Arc<dyn Fetcher> = Arc::new(
        HttpFetcher::new(Duration::from_secs(config.build.fetch_timeout_secs))
            .with_body_limit(config.build.max_body_bytes),
    );

    Ok(OfflineBundle::assemble(scope, store, fetcher, config))
}
