//! Configuration management for `TravelChat` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelChatError;
use crate::chat::Persona;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable read when `llm.api_key` is not configured
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable read when `map.api_key` is not configured
pub const GOOGLE_MAPS_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Root configuration structure for the `TravelChat` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelChatConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Location table configuration
    pub data: DataConfig,
    /// Language-model API configuration
    pub llm: LlmConfig,
    /// Assistant behaviour
    pub assistant: AssistantConfig,
    /// Map view configuration
    pub map: MapConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory with the static front-end
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Location table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path of the delimited locations file
    #[serde(default = "default_locations_path")]
    pub locations_path: String,
    /// Field delimiter, a single character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

/// Chat completion API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_llm_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Assistant settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Which assistant variant greets and answers the user
    #[serde(default)]
    pub persona: Persona,
    /// How far (km) a map click may land from a marker and still select it
    #[serde(default = "default_click_tolerance")]
    pub click_tolerance_km: f64,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map API key; falls back to `GOOGLE_MAPS_API_KEY`
    pub api_key: Option<String>,
    #[serde(default = "default_map_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_map_center_longitude")]
    pub center_longitude: f64,
    #[serde(default = "default_map_zoom")]
    pub zoom: u8,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8501
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_locations_path() -> String {
    "locations.csv".to_string()
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4".to_string()
}

fn default_llm_max_tokens() -> u32 {
    1024
}

fn default_llm_request_timeout() -> u64 {
    120
}

fn default_llm_connect_timeout() -> u64 {
    10
}

fn default_click_tolerance() -> f64 {
    1.0
}

fn default_map_center_latitude() -> f64 {
    50.0
}

fn default_map_center_longitude() -> f64 {
    19.0
}

fn default_map_zoom() -> u8 {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            locations_path: default_locations_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            request_timeout_seconds: default_llm_request_timeout(),
            connect_timeout_seconds: default_llm_connect_timeout(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona: Persona::default(),
            click_tolerance_km: default_click_tolerance(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            center_latitude: default_map_center_latitude(),
            center_longitude: default_map_center_longitude(),
            zoom: default_map_zoom(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DataConfig {
    /// The configured delimiter as a character
    #[must_use]
    pub fn delimiter_char(&self) -> char {
        self.delimiter.chars().next().unwrap_or(';')
    }
}

impl TravelChatConfig {
    /// Load configuration from the given file (or the default location)
    /// and environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVELCHAT_LLM__MODEL=gpt-4o
        builder = builder.add_source(
            Environment::with_prefix("TRAVELCHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelChatConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.apply_key_fallbacks(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelchat").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.data.locations_path.is_empty() {
            self.data.locations_path = default_locations_path();
        }
        if self.data.delimiter.is_empty() {
            self.data.delimiter = default_delimiter();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.max_tokens == 0 {
            self.llm.max_tokens = default_llm_max_tokens();
        }
        if self.llm.request_timeout_seconds == 0 {
            self.llm.request_timeout_seconds = default_llm_request_timeout();
        }
        if self.llm.connect_timeout_seconds == 0 {
            self.llm.connect_timeout_seconds = default_llm_connect_timeout();
        }
        if self.map.zoom == 0 {
            self.map.zoom = default_map_zoom();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Fill API keys left empty in the config from the plain key variables
    pub fn apply_key_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.llm.api_key.as_deref().is_none_or(str::is_empty) {
            self.llm.api_key = lookup(OPENAI_API_KEY_ENV).filter(|key| !key.is_empty());
        }
        if self.map.api_key.as_deref().is_none_or(str::is_empty) {
            self.map.api_key = lookup(GOOGLE_MAPS_API_KEY_ENV).filter(|key| !key.is_empty());
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The key may be missing here; the server refuses to start without one.
        if let Some(api_key) = &self.llm.api_key {
            if api_key.trim().is_empty() {
                return Err(TravelChatError::config(
                    "LLM API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(TravelChatError::config(
                    "LLM API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TravelChatError::config("Server port cannot be 0").into());
        }

        if self.llm.request_timeout_seconds > 600 {
            return Err(
                TravelChatError::config("LLM request timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.llm.max_tokens > 32_768 {
            return Err(TravelChatError::config("LLM max tokens cannot exceed 32768").into());
        }

        if !(self.assistant.click_tolerance_km > 0.0 && self.assistant.click_tolerance_km <= 50.0) {
            return Err(TravelChatError::config(
                "Click tolerance must be greater than 0 and at most 50 km",
            )
            .into());
        }

        if !(-90.0..=90.0).contains(&self.map.center_latitude)
            || !(-180.0..=180.0).contains(&self.map.center_longitude)
        {
            return Err(TravelChatError::config("Map center is not a valid coordinate").into());
        }

        if self.map.zoom > 20 {
            return Err(TravelChatError::config("Map zoom cannot exceed 20").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelChatError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelChatError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.data.delimiter.chars().count() != 1 {
            return Err(TravelChatError::config(format!(
                "Delimiter must be a single character, got '{}'",
                self.data.delimiter
            ))
            .into());
        }

        if !self.llm.base_url.starts_with("http://") && !self.llm.base_url.starts_with("https://")
        {
            return Err(TravelChatError::config(
                "LLM API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    /// Copy of the configuration with secrets masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "********".to_string());
        let mut copy = self.clone();
        copy.llm.api_key = mask(&self.llm.api_key);
        copy.map.api_key = mask(&self.map.api_key);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TravelChatConfig::default();
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.data.delimiter_char(), ';');
        assert_eq!(config.assistant.persona, Persona::Travel);
        assert_eq!(config.map.zoom, 4);
        assert_eq!(config.logging.level, "info");
        assert!(config.llm.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = TravelChatConfig::default();
        config.llm.api_key = Some("sk-valid_api_key_123".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = TravelChatConfig::default();
        config.llm.api_key = Some("sk".to_string());
        assert!(config.validate_api_keys().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelChatConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelChatConfig::default();
        config.llm.request_timeout_seconds = 5000;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_delimiter() {
        let mut config = TravelChatConfig::default();
        config.data.delimiter = ";;".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_key_fallbacks_fill_missing_keys() {
        let mut config = TravelChatConfig::default();
        config.apply_key_fallbacks(|name| match name {
            OPENAI_API_KEY_ENV => Some("sk-from-env-123".to_string()),
            GOOGLE_MAPS_API_KEY_ENV => Some("maps-key".to_string()),
            _ => None,
        });
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-from-env-123"));
        assert_eq!(config.map.api_key.as_deref(), Some("maps-key"));
    }

    #[test]
    fn test_key_fallbacks_keep_configured_key() {
        let mut config = TravelChatConfig::default();
        config.llm.api_key = Some("sk-from-file-123".to_string());
        config.apply_key_fallbacks(|_| Some("sk-from-env-123".to_string()));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-from-file-123"));
    }

    #[test]
    fn test_redacted_masks_keys() {
        let mut config = TravelChatConfig::default();
        config.llm.api_key = Some("sk-secret-value".to_string());
        let shown = config.redacted();
        assert_eq!(shown.llm.api_key.as_deref(), Some("********"));
        assert!(shown.map.api_key.is_none());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[llm]\nmodel = \"gpt-4o\"\n\n[assistant]\npersona = \"sales\"\n\n[data]\nlocations_path = \"data/places.csv\""
        )
        .unwrap();

        let config = TravelChatConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.assistant.persona, Persona::Sales);
        assert_eq!(config.data.locations_path, "data/places.csv");
        assert_eq!(config.server.port, 8501);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TravelChatConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travelchat"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
