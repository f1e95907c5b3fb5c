//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use concierge_config::Settings;

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// One pooled client for all upstream calls
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.llm.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                reqwest::Client::new()
            });
        Self {
            settings: Arc::new(settings),
            client,
        }
    }
}
