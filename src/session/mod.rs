//! Client sessions and their cache bindings

pub mod binder;
pub mod registry;

pub use binder::{SessionBindings, SessionCacheBinder};
pub use registry::{ClientRegistry, KnownClients};
