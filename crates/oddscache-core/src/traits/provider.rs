//! ProviderClient: the upstream abstraction consumed by the edge cache
//! (spec §6).
//!
//! Every call returns `Ok(None)` when the provider responded but had no
//! content — distinct from an `Err` transport failure.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;

#[async_trait]
pub trait ProviderClient: Send + Sync + 'static {
    async fn get_all_sports(&self) -> Result<Option<Value>, CoreError>;

    async fn get_match_list(&self, sport_id: &str) -> Result<Option<Value>, CoreError>;

    async fn get_match_odds(&self, id: &str, sport_id: &str) -> Result<Option<Value>, CoreError>;

    async fn get_match_details(&self, sport_id: &str, id: &str) -> Result<Option<Value>, CoreError>;

    async fn get_live_tv_score(&self, id: &str, sport_id: &str) -> Result<Option<Value>, CoreError>;

    async fn get_virtual_tv(&self, id: &str) -> Result<Option<Value>, CoreError>;

    async fn get_results(&self, sport_id: &str, id: &str) -> Result<Option<Value>, CoreError>;

    async fn get_sidebar_tree(&self) -> Result<Option<Value>, CoreError>;

    async fn get_top_events(&self) -> Result<Option<Value>, CoreError>;

    async fn get_banners(&self) -> Result<Option<Value>, CoreError>;

    /// Pass-through POST (T4): no caching, result returned unmodified.
    async fn post_priority_market(&self, payload: Value) -> Result<Value, CoreError>;
}
