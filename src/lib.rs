//! offline-bundle - versioned offline caches for a web deployment
//!
//! Builds complete snapshots of a deployment's resources from a manifest,
//! pins every session to the snapshot it started with, and keeps only the
//! newest snapshot once no session can still need the older ones.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod factory;
pub mod fetch;
pub mod router;
pub mod scope;
pub mod session;
pub mod store;
pub mod ui;
pub mod update;

pub use error::{OfflineError, OfflineResult};
