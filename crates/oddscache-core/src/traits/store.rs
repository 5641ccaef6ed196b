//! CacheStore (C1): TTL key/value port with stampede-safe `get_or_set`
//! (spec §4.1).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;

/// A factory invoked by `get_or_set` on a cold miss. Boxed so the trait can
/// stay object-safe across backend implementations.
pub type FactoryFuture = Pin<Box<dyn Future<Output = Result<Value, CoreError>> + Send>>;

/// TTL key/value store with glob pattern scan and stampede-protected
/// `get_or_set` (spec §4.1).
///
/// `get` does not let callers distinguish fresh from stale — that
/// distinction is intentionally internal to the store, so callers never
/// make freshness decisions themselves.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Returns the value while `now <= stale_until`, `None` once evicted.
    async fn get(&self, key: &str) -> Result<Option<Value>, CoreError>;

    /// Records `fresh_until = now + ttl` and `stale_until = fresh_until + ttl * stale_multiplier`.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CoreError>;

    /// Removes a key. Returns whether it was present.
    async fn del(&self, key: &str) -> Result<bool, CoreError>;

    async fn exists(&self, key: &str) -> Result<bool, CoreError>;

    /// Keys matching a `*`/`?` glob pattern. Only used for low-cardinality
    /// hot-set enumeration; need not be O(1).
    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CoreError>;

    /// Stampede-protected read-through (spec §4.1 steps 1-3):
    /// 1. Fresh entry exists -> return it.
    /// 2. Stale entry exists -> schedule a coalesced background refresh,
    ///    return the stale value immediately.
    /// 3. Otherwise -> block on a coalesced factory call, store, return it.
    async fn get_or_set(
        &self,
        key: &str,
        ttl: Duration,
        factory: Box<dyn FnOnce() -> FactoryFuture + Send>,
    ) -> Result<Value, CoreError>;

    /// Whether this backend honors stale-while-revalidate. External,
    /// process-shared backends (e.g. Redis) degrade to TTL-only and return
    /// `false` here (spec §9 open question).
    fn supports_swr(&self) -> bool;
}
