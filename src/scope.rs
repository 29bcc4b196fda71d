//! Deployment scope
//!
//! Every cache name, manifest address and stored request key is derived
//! from the scope URL this deployment is served under.

use crate::error::{OfflineError, OfflineResult};
use std::fmt;
use url::Url;

/// Absolute URL prefix that partitions one deployment from another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    url: Url,
}

impl Scope {
    /// Parse a scope URL, appending a trailing slash when missing
    pub fn parse(raw: &str) -> OfflineResult<Self> {
        let raw = raw.trim();
        let mut url = Url::parse(raw).map_err(|e| OfflineError::InvalidScope {
            scope: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(OfflineError::InvalidScope {
                scope: raw.to_string(),
                reason: "scope must be a hierarchical URL".to_string(),
            });
        }

        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { url })
    }

    /// The scope address, always ending in `/`
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Whether a request URL falls under this scope
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(self.as_str())
    }

    /// Resolve a manifest identifier to the absolute URL used as its cache key
    pub fn resolve(&self, id: &str) -> OfflineResult<String> {
        self.url
            .join(id)
            .map(String::from)
            .map_err(|e| OfflineError::InvalidResource {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }

    /// Strip the scope from a main page URL.
    ///
    /// `https://example.com/index.html` becomes `index.html`. When the page
    /// *is* the scope, the full scope address is kept: an empty identifier
    /// would not resolve back to the page.
    pub fn normalize_main_page(&self, url: &str) -> String {
        match url.strip_prefix(self.as_str()) {
            Some("") => self.as_str().to_string(),
            Some(rest) => rest.to_string(),
            None => url.to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
