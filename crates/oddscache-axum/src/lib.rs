//! oddscache-axum: an axum router wiring the edge-handler templates
//! (T1-T4, spec §4.6) and the `/stats` endpoint onto HTTP routes.
//!
//! This crate is thin by design — the coalescing, hot-key, worker-pool and
//! scheduler logic lives in `oddscache`; here we only translate HTTP
//! requests into calls against that facade and map results through
//! `oddscache-http`'s envelope.

pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use routes::build_router;
pub use state::AppState;
