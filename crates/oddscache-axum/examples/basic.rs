//! Minimal wiring: one in-memory cache store, one stub provider, one router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};

use oddscache::{CoreError, EdgeCache, EdgeCacheConfig, ProviderClient};
use oddscache_axum::{build_router, AppState};

struct DemoProvider;

#[async_trait]
impl ProviderClient for DemoProvider {
    async fn get_all_sports(&self) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!([{"id": "4", "name": "soccer"}])))
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
    let config = EdgeCacheConfig::default();
    // Picks `MemoryCacheStore` or the external (Redis) backend per
    // `CACHE_ENABLED`/`CACHE_BACKEND_URL`.
    let store = oddscache_storage::build_store(&config).await.unwrap();
    let cache = Arc::new(EdgeCache::new(store, Arc::new(DemoProvider), config));
    cache.start().await;

    let app: Router = build_router(AppState::new(cache));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    println!("listening on {}", listener.local_addr().unwrap());

    // Uncomment to actually serve:
    // axum::serve(listener, app).await.unwrap();
    let _ = app;
}
