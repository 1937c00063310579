//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedObaClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached OneBusAway client
    pub oba: Arc<CachedObaClient>,
}

impl AppState {
    pub fn new(oba: CachedObaClient) -> Self {
        Self { oba: Arc::new(oba) }
    }
}
