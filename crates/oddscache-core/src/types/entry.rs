//! Cache entry: opaque payload plus temporal metadata (spec §3).

use serde_json::Value;
use std::time::{Duration, Instant};

/// A cached value together with the freshness window that governs whether
/// `get` still returns it.
///
/// Invariant: `fresh_until <= stale_until`. Callers of [`CacheEntry::get`]-style
/// accessors can never distinguish fresh from stale directly — only the
/// owning `CacheStore` branches on it, per spec §4.1.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub fresh_until: Instant,
    pub stale_until: Instant,
}

impl CacheEntry {
    /// Build an entry with `fresh_until = now + ttl` and
    /// `stale_until = fresh_until + ttl * stale_multiplier`.
    pub fn new(value: Value, ttl: Duration, stale_multiplier: u32) -> Self {
        let now = Instant::now();
        let fresh_until = now + ttl;
        let stale_until = fresh_until + ttl * stale_multiplier;
        Self {
            value,
            fresh_until,
            stale_until,
        }
    }

    /// `now <= fresh_until`.
    pub fn is_fresh(&self) -> bool {
        Instant::now() <= self.fresh_until
    }

    /// `fresh_until < now <= stale_until`.
    pub fn is_stale_serving(&self) -> bool {
        let now = Instant::now();
        now > self.fresh_until && now <= self.stale_until
    }

    /// `now > stale_until`.
    pub fn is_evicted(&self) -> bool {
        Instant::now() > self.stale_until
    }
}
