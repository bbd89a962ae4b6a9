use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextOracle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable oracle. Default: `GeminiClient`; tests swap in doubles.
    pub oracle: Arc<dyn TextOracle>,
}
