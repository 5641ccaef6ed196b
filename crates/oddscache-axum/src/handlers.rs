//! Axum handlers wiring the EdgeHandler templates (spec §4.6) onto HTTP
//! routes. Each handler picks its own cache key and template; the template
//! logic itself lives in `oddscache::handlers` so it stays testable without
//! a running HTTP server.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use oddscache::{CoreError, ProviderClient, TierId};
use oddscache_http::{status_for_error, ApiResponse, StatsResponse, WorkerStatsView};

use crate::state::AppState;

/// List-style result: `None`/absent provider content degrades to an
/// empty-data 200, never a 404 (spec §7 "for list endpoints").
fn list_response(result: Result<Value, CoreError>) -> (StatusCode, Json<ApiResponse<Value>>) {
    match result {
        Ok(Value::Null) => (StatusCode::OK, Json(ApiResponse::empty())),
        Ok(v) => (StatusCode::OK, Json(ApiResponse::ok(v))),
        Err(e) => (status_for_error(&e), Json(ApiResponse::from(&e))),
    }
}

/// Entity-style result: `None`/absent provider content is a genuine 404
/// (spec §7 "for details-style endpoints").
fn entity_response(result: Result<Value, CoreError>) -> (StatusCode, Json<ApiResponse<Value>>) {
    match result {
        Ok(Value::Null) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("not found")),
        ),
        Ok(v) => (StatusCode::OK, Json(ApiResponse::ok(v))),
        Err(e) => (status_for_error(&e), Json(ApiResponse::from(&e))),
    }
}

/// `getResults`'s cache TTL (spec §6 table); not one of the §3 timer tiers,
/// since results are only ever refreshed on request (T3-shaped).
const RESULTS_TTL: Duration = Duration::from_secs(3_600);

pub async fn get_sports<P: ProviderClient>(State(state): State<AppState<P>>) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let result = oddscache::handlers::read_through(
        cache.store().as_ref(),
        "sports",
        cache.config().tier(TierId::Bootstrap).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_all_sports().await },
    )
    .await;
    list_response(result)
}

pub async fn get_sidebar<P: ProviderClient>(State(state): State<AppState<P>>) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let result = oddscache::handlers::read_through(
        cache.store().as_ref(),
        "sidebar",
        cache.config().tier(TierId::Sidebar).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_sidebar_tree().await },
    )
    .await;
    list_response(result)
}

pub async fn get_top_events<P: ProviderClient>(State(state): State<AppState<P>>) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let result = oddscache::handlers::read_through(
        cache.store().as_ref(),
        "top-events",
        cache.config().tier(TierId::TopEvents).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_top_events().await },
    )
    .await;
    list_response(result)
}

pub async fn get_banners<P: ProviderClient>(State(state): State<AppState<P>>) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let result = oddscache::handlers::read_through(
        cache.store().as_ref(),
        "banners",
        cache.config().tier(TierId::Banners).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_banners().await },
    )
    .await;
    list_response(result)
}

pub async fn get_match_list<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Path(sport_id): Path<String>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let key = format!("matches:{sport_id}");
    let result = oddscache::handlers::read_through(
        cache.store().as_ref(),
        &key,
        cache.config().tier(TierId::MatchList).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_match_list(&sport_id).await },
    )
    .await;
    list_response(result)
}

#[derive(Debug, Deserialize)]
pub struct OddsQuery {
    #[serde(rename = "sportId")]
    sport_id: String,
}

/// T2 — the 1-Hz hot path's request-side entry point (spec §4.6).
pub async fn get_odds<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
    Query(query): Query<OddsQuery>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let result = oddscache::handlers::odds_read(
        cache.store().as_ref(),
        cache.coalescer(),
        cache.hot_keys(),
        std::sync::Arc::clone(cache.provider()),
        &id,
        &query.sport_id,
        cache.config().provider_request_timeout,
    )
    .await;
    list_response(result)
}

pub async fn get_match_details<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Path((sport_id, id)): Path<(String, String)>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let key = format!("details:{id}");
    let result = oddscache::handlers::on_demand_read(
        cache.store().as_ref(),
        &key,
        cache.config().tier(TierId::OnDemand).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_match_details(&sport_id, &id).await },
    )
    .await;
    entity_response(result)
}

pub async fn get_live_tv<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Path((sport_id, id)): Path<(String, String)>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let key = format!("tv:{id}");
    let result = oddscache::handlers::on_demand_read(
        cache.store().as_ref(),
        &key,
        cache.config().tier(TierId::OnDemand).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_live_tv_score(&id, &sport_id).await },
    )
    .await;
    entity_response(result)
}

pub async fn get_virtual_tv<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Path(id): Path<String>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let key = format!("vtv:{id}");
    let result = oddscache::handlers::on_demand_read(
        cache.store().as_ref(),
        &key,
        cache.config().tier(TierId::OnDemand).cache_ttl,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_virtual_tv(&id).await },
    )
    .await;
    entity_response(result)
}

pub async fn get_results<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Path((sport_id, id)): Path<(String, String)>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let key = format!("results:{sport_id}:{id}");
    let result = oddscache::handlers::on_demand_read(
        cache.store().as_ref(),
        &key,
        RESULTS_TTL,
        cache.config().provider_request_timeout,
        || async { cache.provider().get_results(&sport_id, &id).await },
    )
    .await;
    entity_response(result)
}

/// T4 — pass-through POST (spec §4.6): no cache read or write.
pub async fn post_priority_market<P: ProviderClient>(
    State(state): State<AppState<P>>,
    Json(payload): Json<Value>,
) -> impl axum::response::IntoResponse {
    let cache = &state.cache;
    let result = oddscache::handlers::priority_market_post(
        cache.provider().as_ref(),
        payload,
        cache.config().provider_post_timeout,
    )
    .await;
    match result {
        Ok(v) => (StatusCode::OK, Json(ApiResponse::ok(v))),
        Err(e) => (status_for_error(&e), Json(ApiResponse::from(&e))),
    }
}

pub async fn get_stats<P: ProviderClient>(State(state): State<AppState<P>>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse {
        started: stats.started,
        odds_polling_active: stats.odds_polling_active,
        coalescer_active: stats.coalescer_active,
        worker: WorkerStatsView {
            active: stats.worker.active,
            queued: stats.worker.queued,
            processing: stats.worker.processing,
        },
        hot_keys: stats.hot_keys.into_iter().map(|r| r.id).collect(),
        hot_key_count: stats.hot_key_count,
        ticks_skipped_total: stats.ticks_skipped,
    })
}
