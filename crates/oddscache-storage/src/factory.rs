//! Builds the `CacheStore` backend `EdgeCacheConfig` selects (spec §6
//! "cache.enabled" / "cache.backendUrl": "selects in-memory vs external
//! cache backend").

use std::sync::Arc;

use oddscache_core::{CacheStore, CoreError, EdgeCacheConfig};

use crate::memory::{MemoryCacheStore, MemoryConfig};

#[cfg(feature = "redis")]
use crate::redis::{RedisCacheStore, RedisConfig};

/// `cache_enabled_in_memory == true` (the default) builds the in-memory
/// store; `false` builds the external (Redis) store from
/// `cache_backend_url`, which requires this crate's `redis` feature.
pub async fn build_store(config: &EdgeCacheConfig) -> Result<Arc<dyn CacheStore>, CoreError> {
    if config.cache_enabled_in_memory {
        return Ok(Arc::new(MemoryCacheStore::new(MemoryConfig {
            stale_multiplier: config.stale_multiplier,
            ..MemoryConfig::default()
        })));
    }

    build_external_store(config).await
}

#[cfg(feature = "redis")]
async fn build_external_store(config: &EdgeCacheConfig) -> Result<Arc<dyn CacheStore>, CoreError> {
    let url = config.cache_backend_url.clone().ok_or_else(|| {
        CoreError::Internal("cache.backendUrl is required when cache.enabled is false".into())
    })?;
    let store = RedisCacheStore::new(RedisConfig::new(url)).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn build_external_store(_config: &EdgeCacheConfig) -> Result<Arc<dyn CacheStore>, CoreError> {
    Err(CoreError::Internal(
        "cache.enabled=false requires the oddscache-storage \"redis\" feature".into(),
    ))
}
