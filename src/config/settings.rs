//! Configuration settings for the campus concierge server.

use crate::error::{ConfigError, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("campus.toml"),
            dirs::config_dir()
                .map(|p| p.join("campus-concierge/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".campus-concierge/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.llm.enabled {
            if self.llm.base_url.is_empty() {
                return Err(ConfigError::MissingField("llm.base_url".to_string()).into());
            }
            if self.llm.model.is_empty() {
                return Err(ConfigError::MissingField("llm.model".to_string()).into());
            }
        }

        if self.weather.enabled {
            if self.weather.geocoding_url.is_empty() {
                return Err(ConfigError::MissingField("weather.geocoding_url".to_string()).into());
            }
            if self.weather.forecast_url.is_empty() {
                return Err(ConfigError::MissingField("weather.forecast_url".to_string()).into());
            }
        }

        if self.llm.timeout_secs == 0 || self.weather.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be > 0".to_string()).into());
        }

        if self.search.top_k == 0 {
            return Err(ConfigError::Invalid("search.top_k must be > 0".to_string()).into());
        }

        if !(-12..=14).contains(&self.data.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "data.utc_offset_hours out of range: {}",
                self.data.utc_offset_hours
            ))
            .into());
        }

        Ok(())
    }

    /// Expand the dataset directory path.
    pub fn data_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.data.dir);
        PathBuf::from(expanded.as_ref())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Allowed CORS origins ("*" allows any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Dataset configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory scanned for `*.json` datasets
    pub dir: String,
    /// Offset of the civil timezone used to resolve "today"
    pub utc_offset_hours: i32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "./data".to_string(),
            utc_offset_hours: 9,
        }
    }
}

impl DataConfig {
    /// The fixed civil timezone for relative dates.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

/// External language model (Ollama-compatible) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Enable the conversational collaborator
    pub enabled: bool,
    /// Also use the model for intent classification
    pub classify: bool,
    /// Base URL of the generate API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            classify: true,
            base_url: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Weather and geocoding collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Enable weather lookups
    pub enabled: bool,
    /// Geocoding endpoint
    pub geocoding_url: String,
    /// Forecast endpoint
    pub forecast_url: String,
    /// Place used when the query names none
    pub default_location: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            default_location: "那覇".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Fallback search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of hits returned by fallback search
    pub top_k: usize,
    /// Maximum characters per preview
    pub preview_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            preview_chars: 400,
        }
    }
}
