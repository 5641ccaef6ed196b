//! RequestCoalescer (C2): collapses concurrent fetches for the same key
//! into one in-flight operation (spec §4.2).

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::error::CoreError;

/// Single-flight coalescer keyed by an arbitrary string.
///
/// The first caller for a key becomes the leader: it runs `fetch_fn`,
/// removes the in-flight slot, then broadcasts the result to anyone who
/// joined while it was running. Followers subscribe and await the same
/// broadcast. Slot cleanup happens before the broadcast send, so a settled
/// key never leaves a stale slot behind (spec §4.2 guarantee (c)).
#[derive(Clone)]
pub struct RequestCoalescer<T: Clone + Send + Sync + 'static> {
    inflight: Arc<DashMap<String, broadcast::Sender<Result<T, CoreError>>>>,
    refreshing: Arc<DashMap<String, ()>>,
}

impl<T: Clone + Send + Sync + 'static> Default for RequestCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> RequestCoalescer<T> {
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(DashMap::new()),
            refreshing: Arc::new(DashMap::new()),
        }
    }

    /// Current number of distinct keys with an in-flight fetch.
    pub fn active_count(&self) -> usize {
        self.inflight.len()
    }

    /// Coalesce a fetch for `key`. At most one `fetch_fn` runs per key at a
    /// time (spec §4.2 guarantee (a)); joiners receive the same result as
    /// the originator (guarantee (b)).
    pub async fn coalesce<F, Fut>(&self, key: &str, fetch_fn: F) -> Result<T, CoreError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let mut follower_rx = match self.inflight.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(occ) => Some(occ.get().subscribe()),
            dashmap::mapref::entry::Entry::Vacant(vac) => {
                let (tx, _rx) = broadcast::channel(1);
                vac.insert(tx);
                None
            }
        };

        if let Some(rx) = follower_rx.as_mut() {
            return rx
                .recv()
                .await
                .map_err(|_| CoreError::Internal("coalescer channel closed".into()))?;
        }

        // We are the leader: run the fetch, clear the slot, then broadcast.
        let result = fetch_fn().await;
        if let Some((_, tx)) = self.inflight.remove(key) {
            let _ = tx.send(result.clone());
        }
        result
    }

    /// Dedupe a background refresh: if one is already running for `key`,
    /// do nothing; otherwise spawn `task_factory`'s future and clear the
    /// dedupe slot on completion. Used to implement stale-while-revalidate
    /// without double-firing refreshes for the same key.
    pub fn try_spawn_refresh<F, Fut>(&self, key: &str, task_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        match self.refreshing.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => return,
            dashmap::mapref::entry::Entry::Vacant(vac) => {
                vac.insert(());
            }
        }

        let refreshing = self.refreshing.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            task_factory().await;
            refreshing.remove(&key);
        });
    }
}
