//! Application state.

use std::sync::Arc;

use gscreen_inference::InferenceClient;

use crate::config::ApiConfig;

/// Shared application state.
///
/// Holds no credentials; every handler receives the caller's token in its
/// own request.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub inference: Arc<InferenceClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig, inference: InferenceClient) -> Self {
        Self {
            config,
            inference: Arc::new(inference),
        }
    }
}
