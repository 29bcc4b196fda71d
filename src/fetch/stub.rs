//! In-memory fetcher with fixed routes
//!
//! Serves canned responses and records every request, so lifecycle
//! behavior can be exercised without a network.

use super::{CacheMode, FetchOptions, Fetcher, Response};
use crate::error::{OfflineError, OfflineResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Route {
    Respond { status: u16, body: Vec<u8> },
    Fail(String),
}

/// Fetcher that answers from a routing table
#[derive(Debug, Default)]
pub struct StubFetcher {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<(String, CacheMode)>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and `body`
    pub fn respond(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.routes().insert(
            url.to_string(),
            Route::Respond {
                status,
                body: body.into(),
            },
        );
    }

    /// Make requests for `url` fail at the transport level
    pub fn fail(&self, url: &str, reason: &str) {
        self.routes()
            .insert(url.to_string(), Route::Fail(reason.to_string()));
    }

    /// Serve a manifest for any cache-busted request to `manifest_url`
    pub fn manifest(&self, manifest_url: &str, version: u64, files: &[&str]) {
        let body = serde_json::json!({ "version": version, "files": files });
        self.respond(manifest_url, 200, body.to_string());
    }

    /// All requests seen so far, in order
    pub fn requests(&self) -> Vec<(String, CacheMode)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests whose URL (ignoring the query) equals `url`
    pub fn count(&self, url: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(seen, _)| strip_query(seen) == url)
            .count()
    }

    /// Forget recorded requests
    pub fn reset_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn routes(&self) -> std::sync::MutexGuard<'_, HashMap<String, Route>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str, options: FetchOptions) -> OfflineResult<Response> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_string(), options.cache));

        let route = {
            let routes = self.routes();
            routes
                .get(url)
                .or_else(|| routes.get(strip_query(url)))
                .cloned()
        };

        match route {
            Some(Route::Respond { status, body }) => Ok(Response::new(url, status, body)),
            Some(Route::Fail(reason)) => Err(OfflineError::fetch(url, reason)),
            None => Ok(Response::new(url, 404, Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_and_records() {
        let stub = StubFetcher::new();
        stub.respond("https://example.com/a.js", 200, "a");
        stub.fail("https://example.com/b.js", "connection reset");

        let a = stub
            .fetch("https://example.com/a.js", FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(a.body, b"a");

        let b = stub
            .fetch("https://example.com/b.js", FetchOptions::default())
            .await;
        assert!(b.is_err());

        let missing = stub
            .fetch("https://example.com/c.js", FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(missing.status, 404);

        assert_eq!(stub.requests().len(), 3);
    }

    #[tokio::test]
    async fn query_falls_back_to_base_route() {
        let stub = StubFetcher::new();
        stub.manifest("https://example.com/offline.js", 3, &["a.js"]);

        let resp = stub
            .fetch(
                "https://example.com/offline.js?r=42",
                FetchOptions::with_cache(CacheMode::NoStore),
            )
            .await
            .unwrap();
        assert!(resp.is_ok());
        assert_eq!(stub.count("https://example.com/offline.js"), 1);
        assert_eq!(stub.requests()[0].1, CacheMode::NoStore);
    }
}
