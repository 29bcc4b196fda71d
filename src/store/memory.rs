//! Process-local cache store

use super::{CacheHandle, CacheStore};
use crate::error::OfflineResult;
use crate::fetch::Response;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory store; caches live as long as the store
#[derive(Debug, Default)]
pub struct MemoryStore {
    caches: Mutex<BTreeMap<String, Arc<MemoryCache>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn caches(&self) -> MutexGuard<'_, BTreeMap<String, Arc<MemoryCache>>> {
        self.caches.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, name: &str) -> OfflineResult<Arc<dyn CacheHandle>> {
        let cache: Arc<dyn CacheHandle> = self
            .caches()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCache::default()))
            .clone();
        Ok(cache)
    }

    async fn has(&self, name: &str) -> OfflineResult<bool> {
        Ok(self.caches().contains_key(name))
    }

    async fn keys(&self) -> OfflineResult<Vec<String>> {
        Ok(self.caches().keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> OfflineResult<bool> {
        Ok(self.caches().remove(name).is_some())
    }
}

/// One in-memory cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Response>>,
}

impl MemoryCache {
    fn entries_guard(&self) -> MutexGuard<'_, HashMap<String, Response>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CacheHandle for MemoryCache {
    async fn lookup(&self, request: &str) -> OfflineResult<Option<Response>> {
        Ok(self.entries_guard().get(request).cloned())
    }

    async fn put(&self, request: &str, response: &Response) -> OfflineResult<()> {
        self.entries_guard()
            .insert(request.to_string(), response.clone());
        Ok(())
    }

    async fn entries(&self) -> OfflineResult<Vec<String>> {
        let mut keys: Vec<String> = self.entries_guard().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
