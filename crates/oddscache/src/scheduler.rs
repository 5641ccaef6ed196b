//! TieredScheduler (C5): owns the periodic timers and bootstrap (spec §4.5).
//!
//! One `tokio::time::interval` per timer-driven tier, `MissedTickBehavior::Skip`
//! so a slow tick doesn't burst-fire backlog, and the odds tier additionally
//! gated by an `AtomicBool` "tick in progress" flag cleared only once the
//! worker pool reports `tickComplete` (spec §4.5 pseudocode).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use oddscache_core::{
    with_deadline, CacheStore, EdgeCacheConfig, EdgeMetrics, NoopMetrics, ProviderClient,
    RequestCoalescer, TierId, WorkItem,
};

use crate::hotkeys::HotKeyRegistry;
use crate::worker::WorkerPool;

/// A timer-driven tier's handler: call the provider, cache on non-empty
/// response, never propagate a failure to the timer (spec §4.5 step 1-3).
struct SimpleTier {
    cache_key: &'static str,
    tier: TierId,
}

pub struct TieredScheduler<P: ProviderClient> {
    store: Arc<dyn CacheStore>,
    provider: Arc<P>,
    hot_keys: Arc<HotKeyRegistry>,
    worker_pool: WorkerPool<P>,
    odds_coalescer: Arc<RequestCoalescer<Option<Value>>>,
    config: EdgeCacheConfig,
    metrics: Arc<dyn EdgeMetrics>,
    started: AtomicBool,
    tick_in_progress: Arc<AtomicBool>,
    ticks_skipped: AtomicU64,
    handles: AsyncMutex<Vec<JoinHandle<()>>>,
}

impl<P: ProviderClient> TieredScheduler<P> {
    pub fn new(store: Arc<dyn CacheStore>, provider: Arc<P>, config: EdgeCacheConfig) -> Self {
        Self::with_metrics(store, provider, config, Arc::new(NoopMetrics))
    }

    pub fn with_metrics(
        store: Arc<dyn CacheStore>,
        provider: Arc<P>,
        config: EdgeCacheConfig,
        metrics: Arc<dyn EdgeMetrics>,
    ) -> Self {
        Self::with_coalescer(store, provider, config, metrics, Arc::new(RequestCoalescer::new()))
    }

    /// Accepts an externally-owned odds coalescer so an `EdgeHandler` can
    /// share the same single-flight slot the worker pool fetches through
    /// (spec §4.4/§4.6: both paths key by `odds:<id>`).
    pub fn with_coalescer(
        store: Arc<dyn CacheStore>,
        provider: Arc<P>,
        config: EdgeCacheConfig,
        metrics: Arc<dyn EdgeMetrics>,
        odds_coalescer: Arc<RequestCoalescer<Option<Value>>>,
    ) -> Self {
        let hot_keys = Arc::new(HotKeyRegistry::new(config.odds_hot_ttl));
        let worker_pool = WorkerPool::with_metrics(
            Arc::clone(&store),
            Arc::clone(&provider),
            Arc::clone(&odds_coalescer),
            config.max_concurrency,
            config.tier(TierId::Odds).cache_ttl,
            config.provider_request_timeout,
            Arc::clone(&metrics),
        );

        Self {
            store,
            provider,
            hot_keys,
            worker_pool,
            odds_coalescer,
            config,
            metrics,
            started: AtomicBool::new(false),
            tick_in_progress: Arc::new(AtomicBool::new(false)),
            ticks_skipped: AtomicU64::new(0),
            handles: AsyncMutex::new(Vec::new()),
        }
    }

    pub fn hot_keys(&self) -> &Arc<HotKeyRegistry> {
        &self.hot_keys
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn worker_pool(&self) -> &WorkerPool<P> {
        &self.worker_pool
    }

    pub fn odds_coalescer(&self) -> &Arc<RequestCoalescer<Option<Value>>> {
        &self.odds_coalescer
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.ticks_skipped.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &EdgeCacheConfig {
        &self.config
    }

    /// Installs one interval per timer-driven tier and runs the one-shot
    /// bootstrap. Idempotent (spec §8 invariant 6): a second call is a no-op.
    pub async fn start(self: &Arc<Self>) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        self.bootstrap().await;

        let mut handles = self.handles.lock().await;
        handles.push(self.spawn_simple_tier(SimpleTier {
            cache_key: "matches",
            tier: TierId::MatchList,
        }));
        handles.push(self.spawn_simple_tier(SimpleTier {
            cache_key: "top-events",
            tier: TierId::TopEvents,
        }));
        handles.push(self.spawn_simple_tier(SimpleTier {
            cache_key: "banners",
            tier: TierId::Banners,
        }));
        handles.push(self.spawn_simple_tier(SimpleTier {
            cache_key: "sidebar",
            tier: TierId::Sidebar,
        }));
        handles.push(self.spawn_odds_tier());
    }

    /// Cancels all timer tasks. Cooperative: in-flight worker calls finish
    /// (bounded by their provider deadline) rather than being force-aborted.
    /// Idempotent.
    pub async fn stop(self: &Arc<Self>) {
        if !self.started.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut handles = self.handles.lock().await;
        for h in handles.drain(..) {
            h.abort();
        }
        tokio::time::sleep(self.config.provider_request_timeout).await;
    }

    async fn bootstrap(&self) {
        self.refresh_sports().await;
        self.refresh_sidebar().await;
        self.refresh_top_events().await;
        self.refresh_banners().await;
    }

    async fn refresh_sports(&self) {
        let result = with_deadline(self.config.provider_request_timeout, self.provider.get_all_sports()).await;
        self.apply_simple_result("sports", TierId::Bootstrap, result).await;
    }

    async fn refresh_sidebar(&self) {
        let result = with_deadline(self.config.provider_request_timeout, self.provider.get_sidebar_tree()).await;
        self.apply_simple_result("sidebar", TierId::Sidebar, result).await;
    }

    async fn refresh_top_events(&self) {
        let result = with_deadline(self.config.provider_request_timeout, self.provider.get_top_events()).await;
        self.apply_simple_result("top-events", TierId::TopEvents, result).await;
    }

    async fn refresh_banners(&self) {
        let result = with_deadline(self.config.provider_request_timeout, self.provider.get_banners()).await;
        self.apply_simple_result("banners", TierId::Banners, result).await;
    }

    async fn apply_simple_result(&self, key: &str, tier: TierId, result: Result<Option<Value>, oddscache_core::CoreError>) {
        match result {
            Ok(Some(value)) => {
                let ttl = self.config.tier(tier).cache_ttl;
                if let Err(e) = self.store.set(key, value, ttl).await {
                    self.metrics.record_worker_failure(key, &format!("cache write failed: {e}"));
                }
            }
            Ok(None) => {}
            Err(e) => self.metrics.record_worker_failure(key, &e.to_string()),
        }
    }

    fn spawn_simple_tier(self: &Arc<Self>, tier_def: SimpleTier) -> JoinHandle<()> {
        let Some(interval_dur) = self.config.tier(tier_def.tier).interval else {
            return tokio::spawn(async {});
        };
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval_dur);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await; // consume the immediate first tick; bootstrap already ran
            loop {
                interval.tick().await;
                this.metrics.record_tick(tier_def.tier);
                match tier_def.cache_key {
                    "matches" => this.refresh_all_match_lists().await,
                    "top-events" => this.refresh_top_events().await,
                    "banners" => this.refresh_banners().await,
                    "sidebar" => this.refresh_sidebar().await,
                    _ => {}
                }
            }
        })
    }

    /// The match-list tier has no fixed cache key (it's per-sport); sports
    /// known to the registry are discovered from whatever ids are currently
    /// hot, plus any sport ids seen in the last `getAllSports()` payload
    /// when it is shaped as an array of `{id}` objects.
    async fn refresh_all_match_lists(&self) {
        let mut sport_ids: Vec<String> = self
            .hot_keys
            .list()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.metadata.sport_id)
            .collect();
        sport_ids.sort();
        sport_ids.dedup();

        if let Ok(Some(sports)) = self.store.get("sports").await {
            if let Some(arr) = sports.as_array() {
                for entry in arr {
                    if let Some(id) = entry.get("id").and_then(Value::as_str) {
                        sport_ids.push(id.to_string());
                    }
                }
            }
        }
        sport_ids.sort();
        sport_ids.dedup();

        for sid in sport_ids {
            let result = with_deadline(self.config.provider_request_timeout, self.provider.get_match_list(&sid)).await;
            self.apply_simple_result(&format!("matches:{sid}"), TierId::MatchList, result).await;
        }
    }

    fn spawn_odds_tier(self: &Arc<Self>) -> JoinHandle<()> {
        let interval_dur = self
            .config
            .tier(TierId::Odds)
            .interval
            .unwrap_or(Duration::from_secs(1));
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval_dur);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                this.odds_tick().await;
            }
        })
    }

    async fn odds_tick(&self) {
        if self.tick_in_progress.swap(true, Ordering::SeqCst) {
            self.ticks_skipped.fetch_add(1, Ordering::SeqCst);
            self.metrics.record_tick_skipped(TierId::Odds);
            return;
        }

        self.metrics.record_tick(TierId::Odds);
        let hot = self.hot_keys.list().await.unwrap_or_default();
        if hot.is_empty() {
            self.tick_in_progress.store(false, Ordering::SeqCst);
            return;
        }

        let items: Vec<WorkItem> = hot.into_iter().map(|r| WorkItem::new(r.id, r.metadata.sport_id)).collect();
        self.worker_pool.enqueue(items);

        let tick_in_progress = Arc::clone(&self.tick_in_progress);
        let pool = self.worker_pool.clone();
        tokio::spawn(async move {
            pool.drained().await;
            tick_in_progress.store(false, Ordering::SeqCst);
        });
    }
}
