//! Application state.

use std::sync::Arc;

use cuegen_genai::{GenAiConfig, GeminiClient};
use cuegen_suggest::SuggestClient;

use crate::config::ApiConfig;

/// Shared application state.
///
/// All fields are process-wide, read-only configuration and clients;
/// requests share them but never mutate them.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub genai: Arc<GeminiClient>,
    pub suggest: Arc<SuggestClient>,
}

impl AppState {
    /// Create application state from the environment.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let genai = GeminiClient::new(GenAiConfig::from_env()?)?;
        let suggest = SuggestClient::from_env();

        Ok(Self {
            config,
            genai: Arc::new(genai),
            suggest: Arc::new(suggest),
        })
    }

    /// Build state around preconstructed clients (tests point these at
    /// mock servers).
    pub fn with_clients(config: ApiConfig, genai: GeminiClient, suggest: SuggestClient) -> Self {
        Self {
            config,
            genai: Arc::new(genai),
            suggest: Arc::new(suggest),
        }
    }
}
