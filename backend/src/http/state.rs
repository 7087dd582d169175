//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::AnalysisBackend;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backend every relayed request goes to
    pub backend: Arc<dyn AnalysisBackend>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn AnalysisBackend>, config: RelayConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}
