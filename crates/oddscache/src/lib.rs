//! oddscache: demand-driven polling, coalescing and hot-key fan-out for a
//! real-time sports-data edge cache.
//!
//! [`EdgeCache`] wires the five core components (cache store, coalescer,
//! hot-key registry, worker pool, tiered scheduler) behind one process-wide
//! lifecycle; [`handlers`] holds the per-endpoint templates (T1-T4) that sit
//! in front of it.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use oddscache::{EdgeCache, EdgeCacheConfig};
//! use oddscache_storage::MemoryCacheStore;
//!
//! # async fn run<P: oddscache_core::ProviderClient>(provider: Arc<P>) {
//! let store = Arc::new(MemoryCacheStore::with_defaults());
//! let cache = EdgeCache::new(store, provider, EdgeCacheConfig::default());
//! cache.start().await;
//! # }
//! ```

pub mod handlers;
pub mod hotkeys;
pub mod scheduler;
pub mod worker;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use hotkeys::HotKeyRegistry;
pub use scheduler::TieredScheduler;
pub use worker::{WorkerPool, WorkerStats};

pub use oddscache_core::{
    with_deadline, CacheStore, CoreError, EdgeCacheConfig, EdgeMetrics, HotKeyMetadata,
    HotKeyRecord, LookupOutcome, NoopMetrics, ProviderClient, RequestCoalescer, Result, TierId,
    WorkItem,
};

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Scheduler and worker-pool health, the shape `/stats` renders (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct EdgeCacheStats {
    pub started: bool,
    pub odds_polling_active: bool,
    pub coalescer_active: usize,
    pub worker: WorkerStats,
    pub hot_keys: Vec<HotKeyRecord>,
    pub hot_key_count: usize,
    pub ticks_skipped: u64,
}

/// Process-wide facade tying the cache store, coalescer, hot-key registry,
/// worker pool and scheduler together (spec §5 "Process-wide state").
///
/// `start()`/`stop()` are idempotent; there is no dynamic reconfiguration —
/// a config change means constructing a new `EdgeCache`.
pub struct EdgeCache<P: ProviderClient> {
    store: Arc<dyn CacheStore>,
    coalescer: Arc<RequestCoalescer<Option<Value>>>,
    scheduler: Arc<TieredScheduler<P>>,
}

impl<P: ProviderClient> EdgeCache<P> {
    pub fn new(store: Arc<dyn CacheStore>, provider: Arc<P>, config: EdgeCacheConfig) -> Self {
        Self::with_metrics(store, provider, config, Arc::new(NoopMetrics))
    }

    pub fn with_metrics(
        store: Arc<dyn CacheStore>,
        provider: Arc<P>,
        config: EdgeCacheConfig,
        metrics: Arc<dyn EdgeMetrics>,
    ) -> Self {
        let coalescer = Arc::new(RequestCoalescer::new());
        let scheduler = Arc::new(TieredScheduler::with_coalescer(
            Arc::clone(&store),
            provider,
            config,
            metrics,
            Arc::clone(&coalescer),
        ));
        Self { store, coalescer, scheduler }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn coalescer(&self) -> &Arc<RequestCoalescer<Option<Value>>> {
        &self.coalescer
    }

    pub fn hot_keys(&self) -> &Arc<HotKeyRegistry> {
        self.scheduler.hot_keys()
    }

    pub fn worker_pool(&self) -> &WorkerPool<P> {
        self.scheduler.worker_pool()
    }

    pub fn config(&self) -> &EdgeCacheConfig {
        self.scheduler.config()
    }

    pub fn provider(&self) -> &Arc<P> {
        self.scheduler.provider()
    }

    pub async fn start(&self) {
        self.scheduler.start().await;
    }

    pub async fn stop(&self) {
        self.scheduler.stop().await;
    }

    pub async fn stats(&self) -> EdgeCacheStats {
        let hot_keys = self.hot_keys().list().await.unwrap_or_default();
        EdgeCacheStats {
            started: self.scheduler.is_started(),
            odds_polling_active: self.scheduler.is_started(),
            coalescer_active: self.coalescer.active_count(),
            worker: self.worker_pool().stats(),
            hot_key_count: hot_keys.len(),
            hot_keys,
            ticks_skipped: self.scheduler.ticks_skipped(),
        }
    }
}
