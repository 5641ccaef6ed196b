//! EdgeHandler templates (C6): the per-request logic (spec §4.6).
//!
//! Three read templates plus a pass-through, each a free function over the
//! ports rather than a struct — every endpoint of a given class is a thin
//! wrapper choosing its own key and calling the matching template.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use oddscache_core::{with_deadline, CacheStore, CoreError, HotKeyMetadata, ProviderClient, RequestCoalescer};

use crate::hotkeys::HotKeyRegistry;

/// T1 — pure read-from-cache with provider fallback (sports, sidebar,
/// top events, banners, match list per sport).
pub async fn read_through<F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    tier_ttl: Duration,
    deadline: Duration,
    fetch: F,
) -> Result<Value, CoreError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<Option<Value>, CoreError>>,
{
    if let Some(v) = store.get(key).await? {
        return Ok(v);
    }
    let fetched = with_deadline(deadline, fetch()).await?;
    match fetched {
        Some(v) => {
            store.set(key, v.clone(), tier_ttl).await?;
            Ok(v)
        }
        None => Ok(Value::Null),
    }
}

/// T2 — cache-then-hot for odds by id (spec §4.6).
pub async fn odds_read<P: ProviderClient>(
    store: &dyn CacheStore,
    coalescer: &RequestCoalescer<Option<Value>>,
    hot_keys: &HotKeyRegistry,
    provider: Arc<P>,
    id: &str,
    sport_id: &str,
    deadline: Duration,
) -> Result<Value, CoreError> {
    let key = format!("odds:{id}");
    if let Some(v) = store.get(&key).await? {
        hot_keys.mark(id, sport_id.to_string()).await?;
        return Ok(v);
    }

    let coalesce_key = format!("odds:{id}");
    let id_owned = id.to_string();
    let sport_owned = sport_id.to_string();
    let fetched = coalescer
        .coalesce(&coalesce_key, move || async move {
            with_deadline(deadline, provider.get_match_odds(&id_owned, &sport_owned)).await
        })
        .await?;

    hot_keys.mark(id, sport_id.to_string()).await?;
    Ok(fetched.unwrap_or(Value::Null))
}

/// T3 — on-demand, cached once per id (match details, live TV, virtual TV,
/// results).
pub async fn on_demand_read<F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    on_demand_ttl: Duration,
    deadline: Duration,
    fetch: F,
) -> Result<Value, CoreError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<Option<Value>, CoreError>>,
{
    if let Some(v) = store.get(key).await? {
        return Ok(v);
    }
    let fetched = with_deadline(deadline, fetch()).await?;
    match fetched {
        Some(v) => {
            store.set(key, v.clone(), on_demand_ttl).await?;
            Ok(v)
        }
        None => Ok(Value::Null),
    }
}

/// T4 — pure pass-through POST (priority market): no caching (spec §4.6).
pub async fn priority_market_post<P: ProviderClient>(
    provider: &P,
    payload: Value,
    deadline: Duration,
) -> Result<Value, CoreError> {
    with_deadline(deadline, provider.post_priority_market(payload)).await
}

/// Builds the hot-key metadata payload carried alongside a `mark` call, kept
/// here so call sites (handlers, tests) share the exact shape (spec §3).
pub fn hot_metadata(sport_id: impl Into<String>) -> HotKeyMetadata {
    HotKeyMetadata::new(sport_id)
}
