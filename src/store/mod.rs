//! Durable keyed cache store
//!
//! A store holds named caches; each cache maps a request URL to a
//! response. Two backends are provided:
//! - `MemoryStore`: process-local, used for tests and embedding
//! - `DiskStore`: one directory per cache under a root directory

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use crate::error::OfflineResult;
use crate::fetch::Response;
use async_trait::async_trait;
use std::sync::Arc;

/// Abstract cache store interface
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Open a named cache, creating it if absent
    async fn open(&self, name: &str) -> OfflineResult<Arc<dyn CacheHandle>>;

    /// Check whether a named cache exists
    async fn has(&self, name: &str) -> OfflineResult<bool>;

    /// Names of every cache in the store
    async fn keys(&self) -> OfflineResult<Vec<String>>;

    /// Delete a named cache. Returns `false` if it did not exist.
    async fn delete(&self, name: &str) -> OfflineResult<bool>;
}

/// A single opened cache
#[async_trait]
pub trait CacheHandle: Send + Sync {
    /// Look up a stored response by request URL
    async fn lookup(&self, request: &str) -> OfflineResult<Option<Response>>;

    /// Store a response under a request URL, replacing any previous one
    async fn put(&self, request: &str, response: &Response) -> OfflineResult<()>;

    /// Request URLs currently stored
    async fn entries(&self) -> OfflineResult<Vec<String>>;
}
