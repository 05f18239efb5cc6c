//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, CORS origins,
//! the platform endpoint and the ids of the remote assets.

use navigator_core::AssetIds;
use navigator_platform::http::DEFAULT_TIMEOUT_SECS;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides the platform API key
pub const API_KEY_ENV: &str = "NAVIGATOR_API_KEY";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct NavigatorConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Origins allowed by CORS; empty allows any
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Largest accepted upload body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Remote platform endpoint
    pub platform: PlatformConfig,

    /// Remote asset ids
    #[serde(default)]
    pub assets: AssetIds,
}

/// Remote platform endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform REST API
    pub base_url: String,

    /// API key; overridden by `NAVIGATOR_API_KEY` when set
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

/// Default upload limit: 25 MiB
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl NavigatorConfig {
    /// Load configuration from a TOML file
    ///
    /// The API key from the environment, when present, replaces the one in
    /// the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: NavigatorConfig = toml::from_str(&contents)?;

        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            if !api_key.trim().is_empty() {
                config.platform.api_key = api_key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the fields that have no usable default
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.platform.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("platform.base_url".to_string()));
        }
        if self.platform.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "platform.api_key (or {})",
                API_KEY_ENV
            )));
        }
        if let Err(e) = self.assets.validate() {
            return Err(ConfigError::MissingField(e.to_string()));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        NavigatorConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            max_upload_bytes: default_max_upload_bytes(),
            platform: PlatformConfig {
                base_url: "http://localhost:9999/v1".to_string(),
                api_key: "test-key-do-not-use-in-production".to_string(),
                timeout_secs: default_timeout_secs(),
            },
            assets: AssetIds::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8000);
        assert_eq!(config.platform.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = NavigatorConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            allowed_origins = ["https://app.example.org"]

            [platform]
            base_url = "https://platform.example.org/v1"
            api_key = "secret"
            timeout_secs = 30

            [assets]
            index_id = "idx1"
            pipeline_id = "pipe-1"
        "#;

        let config: NavigatorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.allowed_origins, vec!["https://app.example.org"]);
        assert_eq!(config.platform.timeout_secs, 30);
        assert_eq!(config.assets.index_id, "idx1");
        assert_eq!(config.assets.pipeline_id, "pipe-1");
        // Unset asset ids keep their defaults
        assert_eq!(config.assets.llm_id, AssetIds::default().llm_id);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn test_missing_base_url() {
        let mut config = NavigatorConfig::default_test_config();
        config.platform.base_url = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(f)) if f == "platform.base_url"
        ));
    }

    #[test]
    fn test_from_file_requires_platform_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_port = 8001").unwrap();
        assert!(matches!(
            NavigatorConfig::from_file(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_from_file_missing_file() {
        assert!(matches!(
            NavigatorConfig::from_file("/nonexistent/navigator.toml"),
            Err(ConfigError::FileRead(_))
        ));
    }
}
