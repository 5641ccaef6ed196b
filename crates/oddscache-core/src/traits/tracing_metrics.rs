//! `tracing`-backed [`EdgeMetrics`] implementation.

use std::time::Duration;

use super::metrics::{EdgeMetrics, LookupOutcome};
use crate::types::TierId;

/// Emits structured `tracing` events instead of counting anything itself;
/// pair with a real metrics exporter subscriber in production.
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    pub service_name: Option<String>,
}

impl TracingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_name(service_name: impl Into<String>) -> Self {
        Self {
            service_name: Some(service_name.into()),
        }
    }
}

impl EdgeMetrics for TracingMetrics {
    fn record_lookup(&self, key: &str, outcome: LookupOutcome) {
        tracing::trace!(
            target: "oddscache",
            event = "lookup",
            key,
            outcome = ?outcome,
            service = self.service_name.as_deref(),
        );
    }

    fn record_tick(&self, tier: TierId) {
        tracing::debug!(target: "oddscache", event = "tick", tier = tier.as_str());
    }

    fn record_tick_skipped(&self, tier: TierId) {
        tracing::warn!(target: "oddscache", event = "tick_skipped", tier = tier.as_str());
    }

    fn record_upstream_call(&self, endpoint: &str, latency: Duration, success: bool) {
        if success {
            tracing::debug!(
                target: "oddscache",
                event = "upstream_call",
                endpoint,
                latency_ms = latency.as_millis() as u64,
            );
        } else {
            tracing::warn!(
                target: "oddscache",
                event = "upstream_call_failed",
                endpoint,
                latency_ms = latency.as_millis() as u64,
            );
        }
    }

    fn record_worker_failure(&self, id: &str, reason: &str) {
        tracing::warn!(target: "oddscache", event = "worker_failure", id, reason);
    }

    fn record_hot_key_count(&self, count: usize) {
        tracing::trace!(target: "oddscache", event = "hot_key_count", count);
    }
}
