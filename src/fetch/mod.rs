//! Network fetch primitive
//!
//! Provides a trait for fetching resources that can be implemented by
//! different transports (blocking HTTP agent, in-memory stub).

mod http;
mod stub;

pub use http::{HttpFetcher, DEFAULT_MAX_BODY_BYTES};
pub use stub::StubFetcher;

use crate::error::OfflineResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// How a fetch may interact with transport-level caches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// Let the transport reuse or deduplicate in-flight responses
    #[default]
    Default,
    /// Always revalidate with the origin
    Reload,
    /// Never read or write any transport cache
    NoStore,
}

impl CacheMode {
    /// Request headers that express this mode to HTTP caches
    pub fn request_headers(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Default => &[],
            Self::Reload => &[("Cache-Control", "no-cache"), ("Pragma", "no-cache")],
            Self::NoStore => &[("Cache-Control", "no-store"), ("Pragma", "no-cache")],
        }
    }
}

/// Per-request fetch options
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    pub cache: CacheMode,
}

impl FetchOptions {
    pub fn with_cache(cache: CacheMode) -> Self {
        Self { cache }
    }
}

/// A fetched (or cached) response payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URL the response was produced for
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response with no headers
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> OfflineResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Abstract network fetch interface
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch an absolute URL.
    ///
    /// Non-success statuses are returned as responses; only transport
    /// failures are errors.
    async fn fetch(&self, url: &str, options: FetchOptions) -> OfflineResult<Response>;
}
