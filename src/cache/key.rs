//! Versioned cache naming
//!
//! A cache is identified by a structured `CacheKey`; the flat
//! `<base>-v<version>` string only exists at the store boundary.

use crate::fetch::Response;
use crate::scope::Scope;
use crate::store::CacheHandle;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Separator between the base name and the version number
const VERSION_SEPARATOR: &str = "-v";

/// Structured identity of one cache version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Deployment partition, e.g. `offline-https://example.com/`
    pub base_name: String,
    /// Manifest version
    pub version: u64,
}

impl CacheKey {
    pub fn new(base_name: impl Into<String>, version: u64) -> Self {
        Self {
            base_name: base_name.into(),
            version,
        }
    }

    /// Flat name used in the external store
    pub fn name(&self) -> String {
        format!("{}{}{}", self.base_name, VERSION_SEPARATOR, self.version)
    }

    /// Parse a store name belonging to `base_name`.
    ///
    /// Returns `None` for other deployments and for malformed versions.
    /// Only the canonical spelling is accepted (`-v07` is rejected), so that
    /// every parsed key maps back to exactly the name it came from.
    pub fn parse(base_name: &str, name: &str) -> Option<Self> {
        let digits = name
            .strip_prefix(base_name)?
            .strip_prefix(VERSION_SEPARATOR)?;
        let version: u64 = digits.parse().ok()?;
        let key = Self::new(base_name, version);
        (key.name() == name).then_some(key)
    }
}

impl Ord for CacheKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.base_name.cmp(&other.base_name))
    }
}

impl PartialOrd for CacheKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Derives cache keys for one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNaming {
    base_name: String,
}

impl CacheNaming {
    /// Base name is `<prefix>-<scope>`, e.g. `offline-https://example.com/`
    pub fn new(prefix: &str, scope: &Scope) -> Self {
        Self {
            base_name: format!("{}-{}", prefix, scope),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn key(&self, version: u64) -> CacheKey {
        CacheKey::new(self.base_name.clone(), version)
    }

    pub fn parse(&self, name: &str) -> Option<CacheKey> {
        CacheKey::parse(&self.base_name, name)
    }
}

/// An opened, published cache version
#[derive(Clone)]
pub struct VersionedCache {
    key: CacheKey,
    handle: Arc<dyn CacheHandle>,
}

impl VersionedCache {
    pub fn new(key: CacheKey, handle: Arc<dyn CacheHandle>) -> Self {
        Self { key, handle }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn version(&self) -> u64 {
        self.key.version
    }

    /// Look up a request URL in this version
    pub async fn lookup(&self, request: &str) -> crate::error::OfflineResult<Option<Response>> {
        self.handle.lookup(request).await
    }

    pub fn handle(&self) -> &Arc<dyn CacheHandle> {
        &self.handle
    }
}

impl fmt::Debug for VersionedCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedCache")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl PartialEq for VersionedCache {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for VersionedCache {}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "offline-https://example.com/";

    #[test]
    fn key_name_format() {
        let key = CacheKey::new(BASE, 2);
        assert_eq!(key.name(), "offline-https://example.com/-v2");
        assert_eq!(key.to_string(), key.name());
    }

    #[test]
    fn parse_roundtrip() {
        let key = CacheKey::parse(BASE, "offline-https://example.com/-v17").unwrap();
        assert_eq!(key.version, 17);
        assert_eq!(key.base_name, BASE);
    }

    #[test]
    fn parse_rejects_foreign_and_malformed() {
        assert!(CacheKey::parse(BASE, "offline-https://other.com/-v1").is_none());
        assert!(CacheKey::parse(BASE, "offline-https://example.com/-vnext").is_none());
        assert!(CacheKey::parse(BASE, "offline-https://example.com/-v").is_none());
        assert!(CacheKey::parse(BASE, "offline-https://example.com/-v3abc").is_none());
        assert!(CacheKey::parse(BASE, "offline-https://example.com/-v-3").is_none());
        assert!(CacheKey::parse(BASE, "offline-https://example.com/-v03").is_none());
        assert!(CacheKey::parse(BASE, "offline-https://example.com/").is_none());
    }

    #[test]
    fn keys_order_by_version() {
        let mut keys = vec![
            CacheKey::new(BASE, 10),
            CacheKey::new(BASE, 2),
            CacheKey::new(BASE, 9),
        ];
        keys.sort();
        let versions: Vec<u64> = keys.iter().map(|k| k.version).collect();
        assert_eq!(versions, vec![2, 9, 10]);
    }

    #[test]
    fn naming_from_scope() {
        let scope = Scope::parse("https://example.com/app").unwrap();
        let naming = CacheNaming::new("offline", &scope);
        assert_eq!(naming.base_name(), "offline-https://example.com/app/");
        assert_eq!(
            naming.key(5).name(),
            "offline-https://example.com/app/-v5"
        );
        assert_eq!(naming.parse(&naming.key(5).name()), Some(naming.key(5)));
    }
}
