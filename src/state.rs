// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::provider::CompletionProvider;

pub type SharedState = Arc<AppState>;

/// Read-only after startup; shared by every handler.
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }
}
