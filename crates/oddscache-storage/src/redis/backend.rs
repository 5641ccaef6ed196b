//! External `CacheStore` (spec §9 open question: SWR support is backend
//! capability-gated). Redis owns expiry itself, so there is no stale
//! window to serve from — once a key's native TTL lapses it is simply
//! gone, which is why `supports_swr()` returns `false` here.

use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;

use oddscache_core::{CacheStore, CoreError, FactoryFuture, RequestCoalescer};

use super::config::RedisConfig;

#[derive(Clone)]
pub struct RedisCacheStore {
    pool: Pool<RedisConnectionManager>,
    config: RedisConfig,
    coalescer: std::sync::Arc<RequestCoalescer<Value>>,
}

impl RedisCacheStore {
    pub async fn new(config: RedisConfig) -> Result<Self, CoreError> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))?;

        Ok(Self {
            pool,
            config,
            coalescer: std::sync::Arc::new(RequestCoalescer::new()),
        })
    }

    fn prefixed_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }

    async fn get_connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, CoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let mut conn = self.get_connection().await?;
        let raw: Option<String> = conn
            .get(self.prefixed_key(key))
            .await
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))?;
        match raw {
            Some(s) => serde_json::from_str(&s)
                .map(Some)
                .map_err(|e| CoreError::Internal(format!("corrupt cache entry: {e}"))),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CoreError> {
        let mut conn = self.get_connection().await?;
        let serialized = serde_json::to_string(&value)
            .map_err(|e| CoreError::Internal(format!("cache entry not serializable: {e}")))?;
        let ttl_secs = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(self.prefixed_key(key), serialized, ttl_secs)
            .await
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))
    }

    async fn del(&self, key: &str) -> Result<bool, CoreError> {
        let mut conn = self.get_connection().await?;
        let deleted: u64 = conn
            .del(self.prefixed_key(key))
            .await
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))?;
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, CoreError> {
        let mut conn = self.get_connection().await?;
        conn.exists(self.prefixed_key(key))
            .await
            .map_err(|e| CoreError::UpstreamTransport(e.to_string()))
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CoreError> {
        let mut conn = self.get_connection().await?;
        let match_pattern = self.prefixed_key(pattern);
        let prefix_len = self
            .config
            .key_prefix
            .as_ref()
            .map(|p| p.len() + 1)
            .unwrap_or(0);

        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&match_pattern)
                .arg("COUNT")
                .arg(1000)
                .query_async(&mut *conn)
                .await
                .map_err(|e| CoreError::UpstreamTransport(e.to_string()))?;
            keys.extend(batch.into_iter().map(|k| k[prefix_len..].to_string()));
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(keys)
    }

    async fn get_or_set(
        &self,
        key: &str,
        ttl: Duration,
        factory: Box<dyn FnOnce() -> FactoryFuture + Send>,
    ) -> Result<Value, CoreError> {
        if let Some(hit) = self.get(key).await? {
            return Ok(hit);
        }

        let this = self.clone();
        let key_owned = key.to_string();
        self.coalescer
            .coalesce(key, move || async move {
                if let Some(hit) = this.get(&key_owned).await? {
                    return Ok(hit);
                }
                let value = factory().await?;
                this.set(&key_owned, value.clone(), ttl).await?;
                Ok(value)
            })
            .await
    }

    fn supports_swr(&self) -> bool {
        false
    }
}
