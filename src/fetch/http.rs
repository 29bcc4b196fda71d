//! HTTP fetcher backed by a blocking `ureq` agent

use super::{FetchOptions, Fetcher, Response};
use crate::error::{OfflineError, OfflineResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// User agent for outgoing requests
const USER_AGENT_VALUE: &str = concat!("offline-bundle/", env!("CARGO_PKG_VERSION"));

/// Largest response body read by default (512 MiB)
pub const DEFAULT_MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

/// Fetches resources over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_body: u64,
}

impl HttpFetcher {
    /// Create a fetcher with a global per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            max_body: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Override the largest response body that will be read
    pub fn with_body_limit(mut self, max_body: u64) -> Self {
        self.max_body = max_body;
        self
    }

    fn fetch_blocking(
        agent: &ureq::Agent,
        url: &str,
        options: FetchOptions,
        max_body: u64,
    ) -> OfflineResult<Response> {
        let mut request = agent.get(url).header("User-Agent", USER_AGENT_VALUE);
        for (name, value) in options.cache.request_headers() {
            request = request.header(*name, *value);
        }

        let mut response = request.call().map_err(|e| OfflineError::fetch(url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(max_body)
            .read_to_vec()
            .map_err(|e| OfflineError::fetch(url, format!("reading body: {}", e)))?;

        Ok(Response {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, options: FetchOptions) -> OfflineResult<Response> {
        debug!("Fetching {} ({:?})", url, options.cache);

        let agent = self.agent.clone();
        let target = url.to_string();
        let max_body = self.max_body;
        tokio::task::spawn_blocking(move || {
            Self::fetch_blocking(&agent, &target, options, max_body)
        })
            .await
            .map_err(|e| OfflineError::Internal(format!("Fetch task failed: {}", e)))?
    }
}
