//! Router assembly: one route per endpoint class in spec §6's provider
//! table, plus `/stats` (spec §6 "Downstream HTTP surface").

use axum::routing::{get, post};
use axum::Router;

use oddscache::ProviderClient;

use crate::handlers;
use crate::state::AppState;

/// Builds the full downstream HTTP surface for a given `ProviderClient`.
/// Callers typically nest this under their own prefix or merge it with
/// unrelated routes (auth, wallet, etc. — out of scope per spec §1).
pub fn build_router<P: ProviderClient>(state: AppState<P>) -> Router {
    Router::new()
        .route("/api/sports", get(handlers::get_sports::<P>))
        .route("/api/sidebar", get(handlers::get_sidebar::<P>))
        .route("/api/top-events", get(handlers::get_top_events::<P>))
        .route("/api/banners", get(handlers::get_banners::<P>))
        .route("/api/matches/{sport_id}", get(handlers::get_match_list::<P>))
        .route("/api/odds/{id}", get(handlers::get_odds::<P>))
        .route("/api/details/{sport_id}/{id}", get(handlers::get_match_details::<P>))
        .route("/api/tv/{sport_id}/{id}", get(handlers::get_live_tv::<P>))
        .route("/api/vtv/{id}", get(handlers::get_virtual_tv::<P>))
        .route("/api/results/{sport_id}/{id}", get(handlers::get_results::<P>))
        .route("/api/priority-market", post(handlers::post_priority_market::<P>))
        .route("/stats", get(handlers::get_stats::<P>))
        .with_state(state)
}
