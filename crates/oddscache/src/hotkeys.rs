//! HotKeyRegistry (C3): demand signal driving the odds tier (spec §4.3).
//!
//! Backed by its own `MemoryCacheStore` rather than the caller's main
//! `CacheStore`: hot-set bookkeeping is process-local by spec (§4.1 "coalescing
//! remains process-local") even when the main cache is an external backend,
//! and aging must key off `HOT_TTL` exactly rather than the main store's
//! stale-while-revalidate window, so the registry's store is configured with
//! `stale_multiplier: 0` — an entry's `fresh_until` and `stale_until` coincide,
//! so `list()` never returns an id past its `HOT_TTL`.

use std::time::Duration;

use oddscache_core::{CacheStore, CoreError, HotKeyMetadata, HotKeyRecord};
use oddscache_storage::{MemoryCacheStore, MemoryConfig};

const HOT_PREFIX: &str = "hot:odds:";

fn hot_key(id: &str) -> String {
    format!("{HOT_PREFIX}{id}")
}

pub struct HotKeyRegistry {
    store: MemoryCacheStore,
    hot_ttl: Duration,
}

impl HotKeyRegistry {
    pub fn new(hot_ttl: Duration) -> Self {
        Self {
            store: MemoryCacheStore::new(MemoryConfig {
                max_ttl: hot_ttl * 4,
                stale_multiplier: 0,
            }),
            hot_ttl,
        }
    }

    /// Renew `id`'s hot-key record for another `HOT_TTL`. Idempotent: calling
    /// this again before expiry just resets the window (spec §4.3 invariant).
    pub async fn mark(&self, id: &str, sport_id: impl Into<String>) -> Result<(), CoreError> {
        let metadata = HotKeyMetadata::new(sport_id);
        let value = serde_json::to_value(&metadata)
            .map_err(|e| CoreError::Internal(format!("hot-key metadata not serializable: {e}")))?;
        self.store.set(&hot_key(id), value, self.hot_ttl).await
    }

    /// All currently-hot ids. Tolerates legacy records with no metadata by
    /// defaulting `sport_id` (spec §4.3).
    pub async fn list(&self) -> Result<Vec<HotKeyRecord>, CoreError> {
        let keys = self.store.keys_matching(&format!("{HOT_PREFIX}*")).await?;
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(value) = self.store.get(&key).await? else {
                continue;
            };
            let metadata: HotKeyMetadata = serde_json::from_value(value).unwrap_or_default();
            let id = key.strip_prefix(HOT_PREFIX).unwrap_or(&key).to_string();
            out.push(HotKeyRecord { id, metadata });
        }
        Ok(out)
    }

    pub fn cleanup_expired(&self) -> usize {
        self.store.cleanup_expired()
    }
}
