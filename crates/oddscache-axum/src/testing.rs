//! Test-only `ProviderClient` stub for router-level tests.

#![cfg(test)]

use async_trait::async_trait;
use serde_json::{json, Value};

use oddscache::{CoreError, ProviderClient};

#[derive(Clone, Default)]
pub struct StubProviderClient;

impl StubProviderClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProviderClient for StubProviderClient {
    async fn get_all_sports(&self) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!([{"id": "4"}])))
    }

    async fn get_match_list(&self, sport_id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"sportId": sport_id, "matches": []})))
    }

    async fn get_match_odds(&self, id: &str, sport_id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"id": id, "sportId": sport_id, "price": 1.5})))
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
