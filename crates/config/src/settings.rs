//! Main settings module

use std::path::Path;

use concierge_core::Language;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion service configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Hotel metadata rendered into prompts
    #[serde(default)]
    pub hotel: HotelConfig,

    /// Storage paths
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty defaults to localhost
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Disable to allow all origins (development only)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            cors_enabled: true,
        }
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible base endpoint, e.g. `https://api.openai.com/v1`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Server-held API credential, never sent to the browser
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Request streamed responses from the upstream service
    #[serde(default = "default_true")]
    pub stream: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            stream: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Hotel metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelConfig {
    #[serde(default = "default_hotel_name")]
    pub name: String,

    /// Free-text description injected into the system prompt
    #[serde(default)]
    pub info: String,

    #[serde(default)]
    pub default_language: Language,
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            name: default_hotel_name(),
            info: String::new(),
            default_language: Language::default(),
        }
    }
}

/// Storage paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per store key
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    512
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_hotel_name() -> String {
    "Hotel".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Settings {
    /// Load settings from an optional TOML file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("CONCIERGE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.endpoint is empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port is 0".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.temperature {} out of range 0..=2",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.llm.stream);
        assert_eq!(settings.hotel.default_language, Language::Uk);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9000

[hotel]
name = "Sunrise"
default_language = "en"

[llm]
model = "gpt-4o"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.hotel.name, "Sunrise");
        assert_eq!(settings.hotel.default_language, Language::En);
        assert_eq!(settings.llm.model, "gpt-4o");
        // Unset sections keep their defaults
        assert_eq!(settings.storage.data_dir, "data");
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut settings = Settings::default();
        settings.llm.temperature = 5.0;
        assert!(settings.validate().is_err());
    }
}
