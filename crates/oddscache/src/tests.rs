//! End-to-end scenarios against a mock provider (spec §8 S1-S6).

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use oddscache_core::{CacheStore, EdgeCacheConfig, ProviderClient, RequestCoalescer};
use oddscache_storage::MemoryCacheStore;

use crate::handlers::{odds_read, priority_market_post};
use crate::hotkeys::HotKeyRegistry;
use crate::testing::MockProviderClient;
use crate::EdgeCache;

fn memory_store() -> Arc<dyn CacheStore> {
    Arc::new(MemoryCacheStore::with_defaults())
}

/// S1 — thundering herd: 1000 concurrent odds reads for an absent key
/// collapse into one provider call and all see the same payload.
#[tokio::test]
async fn test_s1_thundering_herd_collapses_to_one_upstream_call() {
    let store = memory_store();
    let coalescer = Arc::new(RequestCoalescer::new());
    let hot = Arc::new(HotKeyRegistry::new(Duration::from_secs(30)));
    let provider = Arc::new(MockProviderClient::new());
    let calls = provider.odds_call_count();

    let mut handles = Vec::new();
    for _ in 0..1000 {
        let store = Arc::clone(&store);
        let coalescer = Arc::clone(&coalescer);
        let hot = Arc::clone(&hot);
        let provider = Arc::clone(&provider);
        handles.push(tokio::spawn(async move {
            odds_read(store.as_ref(), &coalescer, &hot, provider, "G", "4", Duration::from_secs(1)).await
        }));
    }

    let mut results = Vec::new();
    for h in handles {
        results.push(h.await.unwrap().unwrap());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert!(hot.list().await.unwrap().iter().any(|r| r.id == "G"));
}

/// S2 — hot aging: a single mark keeps the odds tier polling for exactly
/// `HOT_TTL`, then the key drops out and polling stops.
#[tokio::test(start_paused = true)]
async fn test_s2_hot_key_ages_out_after_hot_ttl() {
    unsafe { std::env::set_var("ODDS_HOT_TTL_SECS", "30"); }
    unsafe { std::env::set_var("POLL_INTERVALS_ODDS_MS", "1000"); }
    let store = memory_store();
    let provider = Arc::new(MockProviderClient::new());
    let calls = provider.odds_call_count();
    let cache = EdgeCache::new(store, Arc::clone(&provider), EdgeCacheConfig::from_env());

    cache.hot_keys().mark("G", "4").await.unwrap();
    cache.start().await;

    for _ in 0..30 {
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::ZERO).await;
    }
    let calls_within_window = calls.load(Ordering::SeqCst);
    assert!(calls_within_window >= 20, "expected roughly one call per second, got {calls_within_window}");

    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::ZERO).await;
    assert!(cache.hot_keys().list().await.unwrap().is_empty());

    let calls_at_aging = calls.load(Ordering::SeqCst);
    tokio::time::advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::ZERO).await;
    assert_eq!(calls.load(Ordering::SeqCst), calls_at_aging, "no further calls once G aged out");

    cache.stop().await;
    unsafe { std::env::remove_var("ODDS_HOT_TTL_SECS"); }
    unsafe { std::env::remove_var("POLL_INTERVALS_ODDS_MS"); }
}

/// S3 — stale-while-revalidate: ten concurrent readers past `freshUntil`
/// all see the stale payload instantly while exactly one refresh runs.
#[tokio::test(start_paused = true)]
async fn test_s3_stale_reads_trigger_single_background_refresh() {
    let store = MemoryCacheStore::with_defaults();
    let provider = Arc::new(MockProviderClient::new());
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    store
        .set("matches:4", Value::String("v0".into()), Duration::from_secs(120))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(121)).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = store.clone();
        let provider = Arc::clone(&provider);
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            store
                .get_or_set(
                    "matches:4",
                    Duration::from_secs(120),
                    Box::new(move || {
                        Box::pin(async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(provider.get_match_list("4").await?.unwrap_or(Value::Null))
                        })
                    }),
                )
                .await
        }));
    }

    let mut results = Vec::new();
    for h in handles {
        results.push(h.await.unwrap().unwrap());
    }
    assert!(results.iter().all(|v| *v == Value::String("v0".into())));

    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::ZERO).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let refreshed = store.get("matches:4").await.unwrap();
    assert_ne!(refreshed, Some(Value::String("v0".into())));
}

/// S4 — bounded fan-out: 50 hot ids drain under `MAX_CONCURRENCY=5`; the
/// overlapping next tick is skipped.
#[tokio::test(start_paused = true)]
async fn test_s4_bounded_fan_out_and_overlap_skip() {
    unsafe { std::env::set_var("MAX_CONCURRENCY", "5"); }
    unsafe { std::env::set_var("POLL_INTERVALS_ODDS_MS", "1000"); }
    let store = memory_store();
    let provider = Arc::new(MockProviderClient::new().with_odds_delay(Duration::from_millis(200)));
    let cache = EdgeCache::new(store, Arc::clone(&provider), EdgeCacheConfig::from_env());

    for i in 0..50 {
        cache.hot_keys().mark(&format!("G{i}"), "4").await.unwrap();
    }
    cache.start().await;

    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    assert!(cache.worker_pool().stats().active <= 5);

    for _ in 0..10 {
        tokio::time::advance(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::ZERO).await;
    }
    assert_eq!(cache.worker_pool().stats().queued, 0);

    cache.stop().await;
    unsafe { std::env::remove_var("MAX_CONCURRENCY"); }
    unsafe { std::env::remove_var("POLL_INTERVALS_ODDS_MS"); }
}

/// S5 — upstream failure tolerance: a failing timer tick never propagates
/// to the previous cache entry, which keeps serving.
#[tokio::test(start_paused = true)]
async fn test_s5_upstream_failure_keeps_previous_entry_serving() {
    let store = memory_store();
    store
        .set("matches:1", Value::String("stale-but-alive".into()), Duration::from_secs(120))
        .await
        .unwrap();

    struct FailingProvider;
    #[async_trait::async_trait]
    impl ProviderClient for FailingProvider {
        async fn get_all_sports(&self) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_match_list(&self, _: &str) -> Result<Option<Value>, oddscache_core::CoreError> {
            Err(oddscache_core::CoreError::UpstreamTransport("connection refused".into()))
        }
        async fn get_match_odds(&self, _: &str, _: &str) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_match_details(&self, _: &str, _: &str) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_live_tv_score(&self, _: &str, _: &str) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_virtual_tv(&self, _: &str) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_results(&self, _: &str, _: &str) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_sidebar_tree(&self) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_top_events(&self) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn get_banners(&self) -> Result<Option<Value>, oddscache_core::CoreError> {
            Ok(None)
        }
        async fn post_priority_market(&self, payload: Value) -> Result<Value, oddscache_core::CoreError> {
            Ok(payload)
        }
    }

    let cache = EdgeCache::new(store.clone(), Arc::new(FailingProvider), EdgeCacheConfig::from_env());
    cache.start().await;
    tokio::time::advance(Duration::from_secs(61)).await;
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::ZERO).await;

    assert_eq!(store.get("matches:1").await.unwrap(), Some(Value::String("stale-but-alive".into())));
    cache.stop().await;
}

/// S6 — POST pass-through: exactly one upstream POST, no cache interaction,
/// response returned unmodified.
#[tokio::test]
async fn test_s6_post_pass_through_no_caching() {
    let provider = MockProviderClient::new();
    let payload = serde_json::json!({"sportId": "4", "id": "G1", "marketName": "1x2"});

    let result = priority_market_post(&provider, payload.clone(), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(result, payload);
    assert_eq!(provider.post_call_count().load(Ordering::SeqCst), 1);
}
