//! WorkerPool (C4): bounded-concurrency odds fetcher (spec §4.4).
//!
//! A single pump task reads off an unbounded queue and acquires an owned
//! `Semaphore` permit per item before spawning its processing task, the
//! same permit-per-task shape as the pack's worker-pool implementation.
//! `in_flight` counts items that have been enqueued but not yet finished
//! processing; when it returns to zero the pool notifies `tickComplete`
//! waiters (spec §4.4 "processing -> idle"). The fetch behind the
//! coalescer is wrapped in `with_deadline`, same as every other upstream
//! call site (spec §5 "every upstream call has an explicit deadline") —
//! without it a hung provider would hold its semaphore permit and
//! `in_flight` count forever, wedging the odds tier permanently.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Notify, Semaphore};

use oddscache_core::{
    with_deadline, CacheStore, EdgeMetrics, LookupOutcome, NoopMetrics, ProviderClient, RequestCoalescer, WorkItem,
};

fn odds_key(id: &str) -> String {
    format!("odds:{id}")
}

/// Snapshot of pool activity, surfaced at `/stats` (spec §6).
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStats {
    pub active: usize,
    pub queued: usize,
    pub processing: bool,
}

struct Inner<P: ProviderClient> {
    store: Arc<dyn CacheStore>,
    provider: Arc<P>,
    coalescer: Arc<RequestCoalescer<Option<serde_json::Value>>>,
    metrics: Arc<dyn EdgeMetrics>,
    odds_ttl: Duration,
    provider_timeout: Duration,
    active: AtomicUsize,
    in_flight: AtomicUsize,
    notify_idle: Notify,
}

/// Bounded-concurrency queue that fetches hot keys through the provider
/// (spec §4.4).
pub struct WorkerPool<P: ProviderClient> {
    tx: mpsc::UnboundedSender<WorkItem>,
    inner: Arc<Inner<P>>,
}

/// Hand-rolled rather than derived: `#[derive(Clone)]` would add a spurious
/// `P: Clone` bound even though both fields clone through an `Arc`/channel
/// handle regardless of `P`.
impl<P: ProviderClient> Clone for WorkerPool<P> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: ProviderClient> WorkerPool<P> {
    pub fn new(
        store: Arc<dyn CacheStore>,
        provider: Arc<P>,
        coalescer: Arc<RequestCoalescer<Option<serde_json::Value>>>,
        max_concurrency: usize,
        odds_ttl: Duration,
        provider_timeout: Duration,
    ) -> Self {
        Self::with_metrics(
            store,
            provider,
            coalescer,
            max_concurrency,
            odds_ttl,
            provider_timeout,
            Arc::new(NoopMetrics),
        )
    }

    pub fn with_metrics(
        store: Arc<dyn CacheStore>,
        provider: Arc<P>,
        coalescer: Arc<RequestCoalescer<Option<serde_json::Value>>>,
        max_concurrency: usize,
        odds_ttl: Duration,
        provider_timeout: Duration,
        metrics: Arc<dyn EdgeMetrics>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let inner = Arc::new(Inner {
            store,
            provider,
            coalescer,
            metrics,
            odds_ttl,
            provider_timeout,
            active: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            notify_idle: Notify::new(),
        });
        let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
        tokio::spawn(pump(rx, Arc::clone(&inner), semaphore));
        Self { tx, inner }
    }

    /// Enqueue a batch; idempotent duplicates across ticks are cheap since
    /// `process_one` coalesces by key (spec §4.5 tie-break note).
    pub fn enqueue(&self, items: Vec<WorkItem>) {
        if items.is_empty() {
            return;
        }
        self.inner.in_flight.fetch_add(items.len(), Ordering::SeqCst);
        for item in items {
            // Receiver only closes when the pool itself is dropped, so this
            // can't fail while `self` is alive.
            let _ = self.tx.send(item);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) == 0
    }

    /// Resolves once the queue has fully drained, following the
    /// register-before-check pattern so a `tickComplete` fired between
    /// registration and `await` is never missed.
    pub async fn drained(&self) {
        let notified = self.inner.notify_idle.notified();
        if self.is_idle() {
            return;
        }
        notified.await;
    }

    pub fn stats(&self) -> WorkerStats {
        let active = self.inner.active.load(Ordering::SeqCst);
        let in_flight = self.inner.in_flight.load(Ordering::SeqCst);
        WorkerStats {
            active,
            queued: in_flight.saturating_sub(active),
            processing: in_flight > 0,
        }
    }
}

async fn pump<P: ProviderClient>(
    mut rx: mpsc::UnboundedReceiver<WorkItem>,
    inner: Arc<Inner<P>>,
    semaphore: Arc<Semaphore>,
) {
    while let Some(item) = rx.recv().await {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => break,
        };
        inner.active.fetch_add(1, Ordering::SeqCst);
        let inner = Arc::clone(&inner);
        tokio::spawn(async move {
            process_one(&inner, item).await;
            drop(permit);
            inner.active.fetch_sub(1, Ordering::SeqCst);
            if inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                inner.notify_idle.notify_waiters();
            }
        });
    }
}

/// A panic inside this future only unwinds the `tokio::spawn`ed task that
/// owns it (spec §4.4 "panics MUST be isolated to that worker").
async fn process_one<P: ProviderClient>(inner: &Inner<P>, item: WorkItem) {
    let key = odds_key(&item.id);
    let provider = Arc::clone(&inner.provider);
    let id = item.id.clone();
    let sport_id = item.sport_id.clone();
    let deadline = inner.provider_timeout;
    let start = std::time::Instant::now();

    let result = inner
        .coalescer
        .coalesce(&key, move || async move {
            with_deadline(deadline, provider.get_match_odds(&id, &sport_id)).await
        })
        .await;

    match result {
        Ok(Some(value)) => {
            inner
                .metrics
                .record_upstream_call("getMatchOdds", start.elapsed(), true);
            if let Err(e) = inner.store.set(&key, value, inner.odds_ttl).await {
                inner
                    .metrics
                    .record_worker_failure(&item.id, &format!("cache write failed: {e}"));
            } else {
                inner.metrics.record_lookup(&key, LookupOutcome::Miss);
            }
        }
        Ok(None) => {
            // Provider responded with no content: leave the existing entry
            // (if any) to keep aging naturally (spec §8 boundary behavior).
            inner
                .metrics
                .record_upstream_call("getMatchOdds", start.elapsed(), true);
        }
        Err(e) => {
            inner
                .metrics
                .record_upstream_call("getMatchOdds", start.elapsed(), false);
            inner.metrics.record_worker_failure(&item.id, &e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use oddscache_core::CoreError;
    use oddscache_storage::MemoryCacheStore;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize as StdAtomicUsize, Ordering as StdOrdering};

    struct CountingProvider {
        calls: Arc<StdAtomicUsize>,
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl ProviderClient for CountingProvider {
        async fn get_all_sports(&self) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_match_list(&self, _: &str) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_match_odds(&self, id: &str, _sport_id: &str) -> Result<Option<Value>, CoreError> {
            self.calls.fetch_add(1, StdOrdering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(CoreError::UpstreamTransport("timeout".into()));
            }
            Ok(Some(Value::String(format!("odds-for-{id}"))))
        }
        async fn get_match_details(&self, _: &str, _: &str) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_live_tv_score(&self, _: &str, _: &str) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_virtual_tv(&self, _: &str) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_results(&self, _: &str, _: &str) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_sidebar_tree(&self) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_top_events(&self) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn get_banners(&self) -> Result<Option<Value>, CoreError> {
            unimplemented!()
        }
        async fn post_priority_market(&self, _: Value) -> Result<Value, CoreError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_successful_fetch_writes_cache() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::with_defaults());
        let provider = Arc::new(CountingProvider {
            calls: Arc::new(StdAtomicUsize::new(0)),
            delay: Duration::from_millis(1),
            fail: false,
        });
        let pool = WorkerPool::new(
            store.clone(),
            provider,
            Arc::new(RequestCoalescer::new()),
            5,
            Duration::from_secs(2),
            Duration::from_secs(5),
        );

        pool.enqueue(vec![WorkItem::new("G1", "4")]);
        pool.drained().await;

        let value = store.get("odds:G1").await.unwrap();
        assert_eq!(value, Some(Value::String("odds-for-G1".into())));
    }

    #[tokio::test]
    async fn test_bounded_fan_out_never_exceeds_max_concurrency() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::with_defaults());
        let calls = Arc::new(StdAtomicUsize::new(0));
        let provider = Arc::new(CountingProvider {
            calls: calls.clone(),
            delay: Duration::from_millis(50),
            fail: false,
        });
        let pool = WorkerPool::new(
            store,
            provider,
            Arc::new(RequestCoalescer::new()),
            5,
            Duration::from_secs(2),
            Duration::from_secs(5),
        );

        let items: Vec<WorkItem> = (0..50).map(|i| WorkItem::new(format!("G{i}"), "4")).collect();
        pool.enqueue(items);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(pool.stats().active <= 5);

        pool.drained().await;
        assert_eq!(calls.load(StdOrdering::SeqCst), 50);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_write_cache() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::with_defaults());
        let provider = Arc::new(CountingProvider {
            calls: Arc::new(StdAtomicUsize::new(0)),
            delay: Duration::from_millis(1),
            fail: true,
        });
        let pool = WorkerPool::new(
            store.clone(),
            provider,
            Arc::new(RequestCoalescer::new()),
            5,
            Duration::from_secs(2),
            Duration::from_secs(5),
        );

        pool.enqueue(vec![WorkItem::new("G1", "4")]);
        pool.drained().await;

        assert_eq!(store.get("odds:G1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out_and_releases_permit() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::with_defaults());
        let provider = Arc::new(CountingProvider {
            calls: Arc::new(StdAtomicUsize::new(0)),
            delay: Duration::from_secs(10),
            fail: false,
        });
        let pool = WorkerPool::new(
            store.clone(),
            provider,
            Arc::new(RequestCoalescer::new()),
            5,
            Duration::from_secs(2),
            Duration::from_millis(100),
        );

        pool.enqueue(vec![WorkItem::new("G1", "4")]);
        pool.drained().await;

        // The provider never returns within the deadline: no cache write,
        // and `in_flight` still reaches zero so the permit and slot are
        // released rather than held forever (spec §5 deadline guarantee).
        assert_eq!(store.get("odds:G1").await.unwrap(), None);
        assert!(pool.is_idle());
    }

    #[tokio::test]
    async fn test_empty_enqueue_is_idle_noop() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::with_defaults());
        let provider = Arc::new(CountingProvider {
            calls: Arc::new(StdAtomicUsize::new(0)),
            delay: Duration::from_millis(1),
            fail: false,
        });
        let pool = WorkerPool::new(
            store,
            provider,
            Arc::new(RequestCoalescer::new()),
            5,
            Duration::from_secs(2),
            Duration::from_secs(5),
        );

        assert!(pool.is_idle());
        pool.enqueue(vec![]);
        assert!(pool.is_idle());
    }
}
