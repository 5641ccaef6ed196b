//! Shared axum state: one `EdgeCache` handle per process (spec §5
//! "Process-wide state").

use std::sync::Arc;

use oddscache::{EdgeCache, ProviderClient};

/// Cloneable handle axum hands to every handler via [`axum::extract::State`].
/// Cloning is cheap — it's just an `Arc` bump, the same handle backs every
/// request.
pub struct AppState<P: ProviderClient> {
    pub cache: Arc<EdgeCache<P>>,
}

impl<P: ProviderClient> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<P: ProviderClient> AppState<P> {
    pub fn new(cache: Arc<EdgeCache<P>>) -> Self {
        Self { cache }
    }
}
