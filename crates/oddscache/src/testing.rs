//! Test-only `ProviderClient` double shared by the scheduler, handler, and
//! end-to-end suites.

#![cfg(test)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use oddscache_core::{CoreError, ProviderClient};

struct MockInner {
    odds_delay: Mutex<Duration>,
    odds_fail: AtomicBool,
    odds_calls: Arc<AtomicUsize>,
    post_calls: Arc<AtomicUsize>,
    sports: Mutex<Option<Value>>,
}

#[derive(Clone)]
pub struct MockProviderClient {
    inner: Arc<MockInner>,
}

impl MockProviderClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockInner {
                odds_delay: Mutex::new(Duration::ZERO),
                odds_fail: AtomicBool::new(false),
                odds_calls: Arc::new(AtomicUsize::new(0)),
                post_calls: Arc::new(AtomicUsize::new(0)),
                sports: Mutex::new(Some(json!([{"id": "4"}, {"id": "1"}]))),
            }),
        }
    }

    pub fn with_odds_delay(self, delay: Duration) -> Self {
        *self.inner.odds_delay.lock().unwrap() = delay;
        self
    }

    pub fn with_odds_failure(self) -> Self {
        self.inner.odds_fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_no_sports(self) -> Self {
        *self.inner.sports.lock().unwrap() = None;
        self
    }

    pub fn odds_call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.inner.odds_calls)
    }

    pub fn post_call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.inner.post_calls)
    }
}

impl Default for MockProviderClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    async fn get_all_sports(&self) -> Result<Option<Value>, CoreError> {
        Ok(self.inner.sports.lock().unwrap().clone())
    }

    async fn get_match_list(&self, sport_id: &str) -> Result<Option<Value>, CoreError> {
        Ok(Some(json!({"sportId": sport_id, "matches": []})))
    }

    async fn get_match_odds(&self, id: &str, sport_id: &str) -> Result<Option<Value>, CoreError> {
        let delay = *self.inner.odds_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.inner.odds_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.odds_fail.load(Ordering::SeqCst) {
            return Err(CoreError::UpstreamTransport("mock odds failure".into()));
        }
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
        self.inner.post_calls.fetch_add(1, Ordering::SeqCst);
        Ok(payload)
    }
}
