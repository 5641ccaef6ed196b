//! In-memory `CacheStore` (spec §4.1): the single-process reference backend,
//! the only one that honors stale-while-revalidate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;

use oddscache_core::{CacheEntry, CacheStore, CoreError, FactoryFuture, RequestCoalescer};

use super::glob::glob_to_regex;
use super::ttl_index::TtlIndex;

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Upper bound on the key space tracked by the cleanup wheel.
    pub max_ttl: Duration,
    pub stale_multiplier: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_ttl: Duration::from_secs(86_400),
            stale_multiplier: 2,
        }
    }
}

/// `CacheStore` backed by a `DashMap`, with the stale-while-revalidate
/// branching spec §4.1 describes and a `RequestCoalescer` guarding the cold
/// path. Cloning produces a new handle onto the same underlying store.
#[derive(Clone)]
pub struct MemoryCacheStore {
    data: Arc<DashMap<String, CacheEntry>>,
    ttl_index: Arc<RwLock<TtlIndex>>,
    coalescer: Arc<RequestCoalescer<Value>>,
    config: MemoryConfig,
}

impl MemoryCacheStore {
    pub fn new(config: MemoryConfig) -> Self {
        let ttl_index = TtlIndex::new(Duration::from_secs(1), config.max_ttl);
        Self {
            data: Arc::new(DashMap::new()),
            ttl_index: Arc::new(RwLock::new(ttl_index)),
            coalescer: Arc::new(RequestCoalescer::new()),
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    /// Sweep entries the TTL wheel flagged, double-checking eviction before
    /// removal since the wheel's resolution is coarser than `stale_until`.
    pub fn cleanup_expired(&self) -> usize {
        let candidates = self.ttl_index.write().tick();
        let mut count = 0;
        for key in candidates {
            let evicted = self
                .data
                .get(&key)
                .map(|e| e.is_evicted())
                .unwrap_or(false);
            if evicted {
                self.data.remove(&key);
                count += 1;
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    fn store(&self, key: &str, entry: CacheEntry) {
        let total_ttl = entry.stale_until.duration_since(std::time::Instant::now());
        self.ttl_index.write().schedule(key.to_string(), total_ttl);
        self.data.insert(key.to_string(), entry);
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let hit = self.data.get(key).and_then(|entry| {
            if entry.is_evicted() {
                None
            } else {
                Some(entry.value.clone())
            }
        });
        if hit.is_none() {
            self.data.remove(key);
        }
        Ok(hit)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CoreError> {
        let entry = CacheEntry::new(value, ttl, self.config.stale_multiplier);
        self.store(key, entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, CoreError> {
        self.ttl_index.write().remove(key);
        Ok(self.data.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self.data.get(key).map(|e| !e.is_evicted()).unwrap_or(false))
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CoreError> {
        let re = glob_to_regex(pattern);
        Ok(self
            .data
            .iter()
            .filter(|e| !e.value().is_evicted() && re.is_match(e.key()))
            .map(|e| e.key().clone())
            .collect())
    }

    async fn get_or_set(
        &self,
        key: &str,
        ttl: Duration,
        factory: Box<dyn FnOnce() -> FactoryFuture + Send>,
    ) -> Result<Value, CoreError> {
        if let Some(entry) = self.data.get(key) {
            if entry.is_fresh() {
                return Ok(entry.value.clone());
            }
            if entry.is_stale_serving() {
                let stale_value = entry.value.clone();
                drop(entry);
                let this = self.clone();
                let key_owned = key.to_string();
                self.coalescer.try_spawn_refresh(key, move || async move {
                    if let Ok(fresh) = factory().await {
                        let entry = CacheEntry::new(fresh, ttl, this.config.stale_multiplier);
                        this.store(&key_owned, entry);
                    }
                });
                return Ok(stale_value);
            }
        }

        let this = self.clone();
        let key_owned = key.to_string();
        self.coalescer
            .coalesce(key, move || async move {
                let value = factory().await?;
                let entry = CacheEntry::new(value.clone(), ttl, this.config.stale_multiplier);
                this.store(&key_owned, entry);
                Ok(value)
            })
            .await
    }

    fn supports_swr(&self) -> bool {
        true
    }
}
