//! Core trait ports.

mod metrics;
mod provider;
mod store;

pub use metrics::{EdgeMetrics, LookupOutcome, NoopMetrics};
pub use provider::ProviderClient;
pub use store::{CacheStore, FactoryFuture};

#[cfg(feature = "tracing")]
mod tracing_metrics;
#[cfg(feature = "tracing")]
pub use tracing_metrics::TracingMetrics;
