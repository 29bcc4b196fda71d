//! Versioned offline caches
//!
//! Each manifest version is materialized as its own immutable cache named
//! `<prefix>-<scope>-v<version>`. Versions are never shared or patched:
//! a newer manifest produces a new, separate cache and older ones are
//! pruned once nothing can still be pinned to them.
//!
//! # Version Lifecycle
//!
//! | State | Visible in store | Description |
//! |-------|------------------|-------------|
//! | Fetching | no | All files requested, responses held in memory |
//! | Publishing | yes | Writes in progress, not yet handed to any session |
//! | Published | yes | Complete and immutable, may be pinned by sessions |
//! | Pruned | no | Deleted by a navigation after a newer version appeared |

pub mod builder;
pub mod gc;
pub mod key;
pub mod locator;
pub mod manifest;

pub use builder::{BuildKind, CacheBuilder, DEFAULT_GRACE_PERIOD};
pub use gc::GarbageCollector;
pub use key::{CacheKey, CacheNaming, VersionedCache};
pub use locator::VersionLocator;
pub use manifest::{Manifest, ManifestSource};
