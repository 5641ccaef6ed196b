//! Immutable, environment-assembled configuration (spec §6, §9 "Configuration shape").
//!
//! Built once at startup; there is no dynamic reconfiguration. To change a
//! setting, restart the process (`stop()` then `start()`).

use std::collections::HashMap;
use std::time::Duration;

use crate::types::{TierDescriptor, TierId, TIERS};

fn env_duration_ms(key: &str, default_ms: u64) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(default_ms))
}

fn env_duration_secs(key: &str, default_secs: u64) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(default_secs))
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(default)
}

/// Fully-resolved configuration assembled once from the environment.
#[derive(Debug, Clone)]
pub struct EdgeCacheConfig {
    /// Interval and cache TTL per tier, defaulted from [`TIERS`] and
    /// overridable via `POLL_INTERVALS_<TIER>_MS`.
    pub tiers: HashMap<TierId, TierDescriptor>,
    /// Hot-key aging window (spec §4.3 `HOT_TTL`).
    pub odds_hot_ttl: Duration,
    /// Worker pool concurrency bound (spec §4.4 `MAX_CONCURRENCY`).
    pub max_concurrency: usize,
    /// Stale window multiplier relative to fresh TTL (spec §3 `STALE_MULTIPLIER`).
    pub stale_multiplier: u32,
    /// Deadline for GET-style provider calls.
    pub provider_request_timeout: Duration,
    /// Deadline for POST-style provider calls.
    pub provider_post_timeout: Duration,
    /// `true` selects the in-memory `CacheStore`; `false` selects the
    /// external (Redis) backend.
    pub cache_enabled_in_memory: bool,
    /// Connection URL for the external cache backend, when selected.
    pub cache_backend_url: Option<String>,
}

impl Default for EdgeCacheConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl EdgeCacheConfig {
    /// Assemble configuration from environment variables, falling back to
    /// the documented defaults (spec §6) when unset or unparsable.
    pub fn from_env() -> Self {
        let mut tiers = HashMap::new();
        for t in TIERS {
            tiers.insert(t.id, *t);
        }

        if let Some(d) = tiers.get_mut(&TierId::Odds) {
            d.interval = Some(env_duration_ms("POLL_INTERVALS_ODDS_MS", 1_000));
        }
        if let Some(d) = tiers.get_mut(&TierId::MatchList) {
            d.interval = Some(env_duration_ms("POLL_INTERVALS_MATCH_LIST_MS", 60_000));
        }
        if let Some(d) = tiers.get_mut(&TierId::TopEvents) {
            d.interval = Some(env_duration_ms("POLL_INTERVALS_TOP_EVENTS_MS", 3_600_000));
        }
        if let Some(d) = tiers.get_mut(&TierId::Banners) {
            d.interval = Some(env_duration_ms("POLL_INTERVALS_BANNERS_MS", 3_600_000));
        }
        if let Some(d) = tiers.get_mut(&TierId::Sidebar) {
            d.interval = Some(env_duration_ms("POLL_INTERVALS_SIDEBAR_MS", 86_400_000));
        }

        Self {
            tiers,
            odds_hot_ttl: env_duration_secs("ODDS_HOT_TTL_SECS", 30),
            max_concurrency: env_u32("MAX_CONCURRENCY", 5) as usize,
            stale_multiplier: env_u32("STALE_MULTIPLIER", 2),
            provider_request_timeout: env_duration_ms("PROVIDER_REQUEST_TIMEOUT_MS", 3_000),
            provider_post_timeout: env_duration_ms("PROVIDER_POST_TIMEOUT_MS", 5_000),
            cache_enabled_in_memory: env_bool("CACHE_ENABLED", true),
            cache_backend_url: std::env::var("CACHE_BACKEND_URL").ok(),
        }
    }

    pub fn tier(&self, id: TierId) -> TierDescriptor {
        *self
            .tiers
            .get(&id)
            .unwrap_or_else(|| crate::types::tier(id))
    }
}
