//! Application state management

use std::sync::Arc;

use crate::{media_storage::ObjectStore, types::BackendConfig};

/// Application state shared across handlers
///
/// Read-only after startup; requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    /// Backend that receives uploaded objects
    pub store: Arc<dyn ObjectStore>,
    /// Immutable process configuration
    pub config: Arc<BackendConfig>,
}

impl AppState {
    /// Creates the state from its dependencies
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: Arc<BackendConfig>) -> Self {
        Self { store, config }
    }
}
