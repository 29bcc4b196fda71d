//! Session to cache version pinning
//!
//! The first resource request of a page load that carries a session id
//! decides which cache version the whole page load uses. Many of those
//! first requests arrive together, each starting its own "find newest"
//! lookup; whichever lookup *finishes* first is recorded and every other
//! caller adopts it. A recorded "no cache" is just as permanent.

use crate::cache::{VersionLocator, VersionedCache};
use crate::error::OfflineResult;
use crate::session::registry::ClientRegistry;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Pin-once table of session bindings
#[derive(Debug, Default)]
pub struct SessionBindings {
    inner: Mutex<HashMap<String, Option<VersionedCache>>>,
}

impl SessionBindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Option<VersionedCache>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Existing binding, if the session has one.
    ///
    /// The outer `Option` is "bound or not"; the inner one is the binding
    /// itself, where `None` means "no cache, always use the network".
    pub fn get(&self, session_id: &str) -> Option<Option<VersionedCache>> {
        self.table().get(session_id).cloned()
    }

    /// Record `binding` unless the session is already bound.
    ///
    /// Returns the binding that is in effect afterwards, which is the
    /// earlier one if another caller got there first.
    pub fn bind_if_absent(
        &self,
        session_id: &str,
        binding: Option<VersionedCache>,
    ) -> Option<VersionedCache> {
        match self.table().entry(session_id.to_string()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                info!(
                    "Binding session '{}' to {}",
                    session_id,
                    binding
                        .as_ref()
                        .map_or_else(|| "network".to_string(), |c| c.key().to_string())
                );
                slot.insert(binding).clone()
            }
        }
    }

    /// Drop a session's binding once the session itself is gone
    pub fn remove(&self, session_id: &str) -> bool {
        self.table().remove(session_id).is_some()
    }

    /// Keep only the sessions for which `keep` holds; returns the dropped ids
    pub fn retain(&self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let mut table = self.table();
        let dropped: Vec<String> = table.keys().filter(|id| !keep(id)).cloned().collect();
        for id in &dropped {
            table.remove(id);
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

/// Resolves the cache version a session is pinned to
pub struct SessionCacheBinder {
    locator: VersionLocator,
    bindings: SessionBindings,
}

impl SessionCacheBinder {
    pub fn new(locator: VersionLocator) -> Self {
        Self {
            locator,
            bindings: SessionBindings::new(),
        }
    }

    pub fn bindings(&self) -> &SessionBindings {
        &self.bindings
    }

    /// Cache version for a session, pinning it on first use.
    ///
    /// Requests without a session id (navigations) are never recorded and
    /// resolve to `None`; callers handle them through pruning instead. A
    /// failed lookup is returned as an error and leaves the session
    /// unbound, so a later request can still pin it.
    pub async fn resolve(&self, session_id: Option<&str>) -> OfflineResult<Option<VersionedCache>> {
        let Some(session_id) = session_id.filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        if let Some(bound) = self.bindings.get(session_id) {
            return Ok(bound);
        }

        debug!("No binding for session '{}', looking up newest cache", session_id);
        let newest = self.locator.find_newest().await?;

        Ok(self.bindings.bind_if_absent(session_id, newest))
    }

    /// Forget a session that has ended.
    ///
    /// Hosts that cannot list live sessions through
    /// `ClientRegistry::live_sessions` call this when a page load ends.
    pub fn release(&self, session_id: &str) -> bool {
        let removed = self.bindings.remove(session_id);
        if removed {
            debug!("Released session '{}'", session_id);
        }
        removed
    }

    /// Drop the bindings of every session the registry no longer reports.
    ///
    /// Does nothing when the registry does not track sessions.
    pub async fn sweep(&self, clients: &dyn ClientRegistry) -> usize {
        let Some(live) = clients.live_sessions().await else {
            return 0;
        };
        let live: HashSet<String> = live.into_iter().collect();

        let dropped = self.bindings.retain(|id| live.contains(id));
        if !dropped.is_empty() {
            info!("Released {} ended session(s)", dropped.len());
            debug!("Ended sessions: {}", dropped.join(", "));
        }
        dropped.len()
    }
}
