//! A closer-to-production main: structured logging via `tracing-subscriber`,
//! `/stats` behind the same router, and a `stop()` call wired to Ctrl-C
//! (spec §5 "`stop()` at graceful shutdown, called from signal handler").

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use oddscache::{CoreError, EdgeCache, EdgeCacheConfig, ProviderClient};
use oddscache_axum::{build_router, AppState};
use oddscache_core::TracingMetrics;

struct DemoProvider;

#[async_trait]
impl ProviderClient for DemoProvider {
    async fn get_all_sports(&self) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!([{"id": "4"}])))
    }
    async fn get_match_list(&self, sport_id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"sportId": sport_id, "matches": []})))
    }
    async fn get_match_odds(&self, id: &str, sport_id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"id": id, "sportId": sport_id, "price": 1.85})))
    }
    async fn get_match_details(&self, _sport_id: &str, id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"id": id})))
    }
    async fn get_live_tv_score(&self, id: &str, _sport_id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"id": id, "score": "0-0"})))
    }
    async fn get_virtual_tv(&self, id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"id": id})))
    }
    async fn get_results(&self, _sport_id: &str, id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"id": id, "result": "final"})))
    }
    async fn get_sidebar_tree(&self) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"tree": []})))
    }
    async fn get_top_events(&self) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"events": []})))
    }
    async fn get_banners(&self) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"banners": []})))
    }
    async fn post_priority_market(&self, payload: Value) -> Result<Value, CoreError> {
        Ok(payload)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EdgeCacheConfig::from_env();
    // Picks `MemoryCacheStore` or the external (Redis) backend per
    // `CACHE_ENABLED`/`CACHE_BACKEND_URL`.
    let store = oddscache_storage::build_store(&config)
        .await
        .expect("failed to build cache store from CACHE_ENABLED/CACHE_BACKEND_URL");
    let metrics = Arc::new(TracingMetrics::with_service_name("oddscache-demo"));
    let cache = Arc::new(EdgeCache::with_metrics(store, Arc::new(DemoProvider), config, metrics));
    cache.start().await;

    let app = build_router(AppState::new(Arc::clone(&cache)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    tracing::info!(addr = %listener.local_addr().unwrap(), "listening");

    let shutdown_cache = Arc::clone(&cache);
    let shutdown = async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown_cache.stop().await;
    };

    // Uncomment to actually serve:
    // axum::serve(listener, app).with_graceful_shutdown(shutdown).await.unwrap();
    let _ = (app, shutdown);
}
