//! Serving requests from pinned caches
//!
//! Requests come in two classes:
//! - navigations carry no session id yet; they prune old versions, are
//!   answered from whatever version is newest, and kick off an update check
//! - sub-resource requests carry a session id and are answered from the
//!   version that session is pinned to
//!
//! Any miss or cache-path failure falls through to the network, so the
//! worst case is behaving as if no offline cache existed.

use crate::cache::{CacheKey, GarbageCollector, VersionedCache};
use crate::error::OfflineResult;
use crate::fetch::{FetchOptions, Fetcher, Response};
use crate::scope::Scope;
use crate::session::{ClientRegistry, SessionCacheBinder};
use crate::update::{UpdateCoordinator, UpdateStatus};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Request class as reported by the interception layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Navigate,
    SubResource,
}

/// An intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub mode: RequestMode,
    pub session_id: Option<String>,
}

impl Request {
    /// A navigation; navigations never carry a session id
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: RequestMode::Navigate,
            session_id: None,
        }
    }

    /// A sub-resource request issued by a session
    pub fn sub_resource(url: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: RequestMode::SubResource,
            session_id: Some(session_id.into()),
        }
    }
}

/// Where a response came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Cache(CacheKey),
    Network,
}

/// A response plus its provenance
#[derive(Debug)]
pub struct Served {
    pub response: Response,
    pub source: Source,
    /// Update check started by a navigation; never awaited by the router
    pub update_check: Option<JoinHandle<UpdateStatus>>,
}

/// Routes intercepted requests to caches or the network
pub struct OfflineRouter {
    scope: Scope,
    fetcher: Arc<dyn Fetcher>,
    binder: SessionCacheBinder,
    gc: GarbageCollector,
    updater: Arc<UpdateCoordinator>,
    clients: Option<Arc<dyn ClientRegistry>>,
}

impl OfflineRouter {
    pub fn new(
        scope: Scope,
        fetcher: Arc<dyn Fetcher>,
        binder: SessionCacheBinder,
        gc: GarbageCollector,
        updater: Arc<UpdateCoordinator>,
    ) -> Self {
        Self {
            scope,
            fetcher,
            binder,
            gc,
            updater,
            clients: None,
        }
    }

    /// Drop bindings of ended sessions on every navigation
    pub fn with_clients(mut self, clients: Arc<dyn ClientRegistry>) -> Self {
        self.clients = Some(clients);
        self
    }

    pub fn binder(&self) -> &SessionCacheBinder {
        &self.binder
    }

    /// Forget a session the host knows has ended
    pub fn end_session(&self, session_id: &str) -> bool {
        self.binder.release(session_id)
    }

    /// Answer one request.
    ///
    /// Only a failing network fetch is an error; every cache-side failure
    /// degrades to the network.
    pub async fn handle(&self, request: &Request) -> OfflineResult<Served> {
        if !self.scope.contains(&request.url) {
            debug!("Out-of-scope fetch for URL: {}", request.url);
            return self.from_network(request, None).await;
        }

        debug!(
            "Fetch: {} (session '{}')",
            request.url,
            request.session_id.as_deref().unwrap_or_default()
        );

        match request.mode {
            RequestMode::Navigate => self.handle_navigation(request).await,
            RequestMode::SubResource => self.handle_sub_resource(request).await,
        }
    }

    async fn handle_navigation(&self, request: &Request) -> OfflineResult<Served> {
        let cache = self.gc.prune_to_newest().await.unwrap_or_else(|e| {
            warn!("Pruning old caches failed: {}", e);
            None
        });
        if let Some(clients) = &self.clients {
            self.binder.sweep(clients.as_ref()).await;
        }

        let updater = Arc::clone(&self.updater);
        let main_resource = request.url.clone();
        let update_check =
            tokio::spawn(async move { updater.check_for_update(&main_resource).await });

        match self.lookup(cache.as_ref(), &request.url).await {
            Some(served) => Ok(Served {
                update_check: Some(update_check),
                ..served
            }),
            None => self.from_network(request, Some(update_check)).await,
        }
    }

    async fn handle_sub_resource(&self, request: &Request) -> OfflineResult<Served> {
        let cache = self
            .binder
            .resolve(request.session_id.as_deref())
            .await
            .unwrap_or_else(|e| {
                warn!("Resolving cache for session failed: {}", e);
                None
            });

        match self.lookup(cache.as_ref(), &request.url).await {
            Some(served) => Ok(served),
            None => self.from_network(request, None).await,
        }
    }

    async fn lookup(&self, cache: Option<&VersionedCache>, url: &str) -> Option<Served> {
        let cache = cache?;
        match cache.lookup(url).await {
            Ok(Some(response)) => {
                debug!("Returned '{}' from cache {}", url, cache.key());
                Some(Served {
                    response,
                    source: Source::Cache(cache.key().clone()),
                    update_check: None,
                })
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Cache lookup for '{}' failed: {}", url, e);
                None
            }
        }
    }

    async fn from_network(
        &self,
        request: &Request,
        update_check: Option<JoinHandle<UpdateStatus>>,
    ) -> OfflineResult<Served> {
        debug!("'{}' not in cache, dispatching to network", request.url);
        let response = self
            .fetcher
            .fetch(&request.url, FetchOptions::default())
            .await?;
        Ok(Served {
            response,
            source: Source::Network,
            update_check,
        })
    }
}
