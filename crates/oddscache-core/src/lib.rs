//! oddscache-core: data model, error taxonomy, and port traits for the
//! real-time sports-data edge cache.
//!
//! This crate has no knowledge of HTTP, Redis, or any concrete provider —
//! it only defines the shapes (`CacheEntry`, `HotKeyRecord`, `TierDescriptor`,
//! `WorkItem`), the error taxonomy (`CoreError`), the ports backends and
//! providers implement (`CacheStore`, `ProviderClient`), and the single-flight
//! primitive (`RequestCoalescer`) reused both by cache-store implementations
//! and by the worker pool.

mod coalesce;
mod config;
mod deadline;
mod error;
mod traits;
mod types;

pub use coalesce::RequestCoalescer;
pub use config::EdgeCacheConfig;
pub use deadline::with_deadline;
pub use error::{CoreError, Result};
pub use traits::*;
pub use types::*;
