//! Layered application settings
//!
//! Settings come from an optional TOML file plus `CONCIERGE__`-prefixed
//! environment variables, e.g. `CONCIERGE__LLM__API_KEY`.

pub mod settings;

pub use settings::{HotelConfig, LlmSettings, ServerConfig, Settings, StorageConfig};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
