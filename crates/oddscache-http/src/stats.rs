//! `/stats` response shape (spec §6).
//!
//! Kept free of any dependency on `oddscache` itself — the axum crate
//! converts `oddscache::EdgeCacheStats` into this wire shape — so that
//! `oddscache-http` stays a pure data/mapping crate reusable by any
//! transport, not just axum.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerStatsView {
    pub active: usize,
    pub queued: usize,
    pub processing: bool,
}

/// `{started, oddsPollingActive, coalescerActive, worker, hotKeys, hotKeyCount}`
/// (spec §6). `ticksSkippedTotal` answers the §9 open question ("no
/// alerting threshold is specified; implementers should expose a metric").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub started: bool,
    pub odds_polling_active: bool,
    pub coalescer_active: usize,
    pub worker: WorkerStatsView,
    pub hot_keys: Vec<String>,
    pub hot_key_count: usize,
    pub ticks_skipped_total: u64,
}
