//! oddscache-http: the downstream response envelope and `/stats` wire
//! shape (spec §6), plus the §7 error-taxonomy-to-status-code mapping.
//!
//! Deliberately transport-agnostic: no axum types here, so the envelope is
//! reusable from any framework. `oddscache-axum` is the crate that wires
//! these shapes onto actual routes.

pub mod envelope;
pub mod stats;

pub use envelope::{status_for_error, ApiResponse};
pub use stats::{StatsResponse, WorkerStatsView};
