//! Pruning superseded cache versions
//!
//! Retention is "newest wins". Pruning is only safe where no live session
//! can still be pinned to an older version; the router calls it from
//! navigation requests only, which by definition carry no binding yet.

use crate::cache::key::VersionedCache;
use crate::cache::locator::VersionLocator;
use crate::error::OfflineResult;
use futures_util::future::try_join_all;
use tracing::{debug, info};

/// Deletes every version except the newest
#[derive(Clone)]
pub struct GarbageCollector {
    locator: VersionLocator,
}

impl GarbageCollector {
    pub fn new(locator: VersionLocator) -> Self {
        Self { locator }
    }

    /// Delete all but the newest version and return the survivor
    pub async fn prune_to_newest(&self) -> OfflineResult<Option<VersionedCache>> {
        let mut versions = self.locator.versions().await?;
        debug!(
            "Version list: {}",
            versions
                .iter()
                .map(|k| k.version.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );

        let Some(newest) = versions.pop() else {
            return Ok(None);
        };

        let store = self.locator.store();
        let deleted = try_join_all(versions.iter().map(|key| {
            let name = key.name();
            async move {
                info!("Deleting old cache: {}", name);
                store.delete(&name).await
            }
        }))
        .await?;

        let already_gone = deleted.iter().filter(|removed| !**removed).count();
        if already_gone > 0 {
            debug!("{} old caches were already removed", already_gone);
        }

        debug!("Using newest cache: {}", newest);
        Ok(Some(self.locator.open(newest).await?))
    }
}
