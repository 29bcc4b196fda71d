//! Discovering published cache versions

use crate::cache::key::{CacheKey, CacheNaming, VersionedCache};
use crate::error::OfflineResult;
use crate::store::CacheStore;
use std::sync::Arc;
use tracing::debug;

/// Enumerates and opens the versions belonging to one deployment
#[derive(Clone)]
pub struct VersionLocator {
    store: Arc<dyn CacheStore>,
    naming: CacheNaming,
}

impl VersionLocator {
    pub fn new(store: Arc<dyn CacheStore>, naming: CacheNaming) -> Self {
        Self { store, naming }
    }

    pub fn naming(&self) -> &CacheNaming {
        &self.naming
    }

    pub(crate) fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Keys of every published version, oldest first.
    ///
    /// Names from other deployments or with unparseable versions are
    /// skipped.
    pub async fn versions(&self) -> OfflineResult<Vec<CacheKey>> {
        let mut keys: Vec<CacheKey> = self
            .store
            .keys()
            .await?
            .iter()
            .filter_map(|name| {
                let key = self.naming.parse(name);
                if key.is_none() && name.starts_with(self.naming.base_name()) {
                    debug!("Ignoring malformed cache name '{}'", name);
                }
                key
            })
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Whether a cache for `version` exists
    pub async fn exists(&self, version: u64) -> OfflineResult<bool> {
        self.store.has(&self.naming.key(version).name()).await
    }

    /// Open a known version
    pub async fn open(&self, key: CacheKey) -> OfflineResult<VersionedCache> {
        let handle = self.store.open(&key.name()).await?;
        Ok(VersionedCache::new(key, handle))
    }

    /// Open the newest version, if any exists
    pub async fn find_newest(&self) -> OfflineResult<Option<VersionedCache>> {
        match self.versions().await?.pop() {
            Some(newest) => {
                debug!("Using newest cache: {}", newest);
                Ok(Some(self.open(newest).await?))
            }
            None => Ok(None),
        }
    }
}
