//! Worker queue entry (spec §3).

/// An id/sport pair queued for an odds refresh. Append-only FIFO; no
/// de-duplication here — the coalescer (C2) makes duplicates cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub id: String,
    pub sport_id: String,
}

impl WorkItem {
    pub fn new(id: impl Into<String>, sport_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sport_id: sport_id.into(),
        }
    }
}
