//! File configuration for the `huntcraft` binary.

use derive_getters::Getters;
use huntcraft_database::DatabaseConfig;
use huntcraft_error::{ConfigError, HuntcraftResult};
use huntcraft_models::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "huntcraft.toml";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// The `[logging]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    level: String,
    /// Output format
    format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Creates a logging config.
    pub fn new(level: impl Into<String>, format: LogFormat) -> Self {
        Self {
            level: level.into(),
            format,
        }
    }
}

/// Top-level configuration: gateway, database and logging tables.
///
/// Every table and every key is optional.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct HuntcraftConfig {
    /// Story gateway settings
    gateway: GatewayConfig,
    /// Database settings
    database: DatabaseConfig,
    /// Logging settings
    logging: LoggingConfig,
}

impl HuntcraftConfig {
    /// Returns a builder for constructing a HuntcraftConfig.
    pub fn builder() -> HuntcraftConfigBuilder {
        HuntcraftConfigBuilder::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(content: &str) -> HuntcraftResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)).into())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> HuntcraftResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file exists but is invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> HuntcraftResult<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(HuntcraftConfig::from_toml_str("").unwrap(), HuntcraftConfig::default());
    }

    #[test]
    fn test_sections() {
        let config = HuntcraftConfig::from_toml_str(
            r#"
            [gateway]
            base_url = "http://localhost:8080/v1/chat/completions"
            temperature = 0.4
            timeout_secs = 30

            [database]
            url_env = "HUNTCRAFT_DATABASE_URL"
            pool_size = 4

            [logging]
            level = "huntcraft=debug"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.gateway().base_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(*config.gateway().timeout_secs(), 30);
        assert_eq!(config.gateway().model(), huntcraft_models::DEFAULT_MODEL);
        assert_eq!(config.database().url_env(), "HUNTCRAFT_DATABASE_URL");
        assert_eq!(*config.database().pool_size(), 4);
        assert_eq!(config.logging().level(), "huntcraft=debug");
        assert_eq!(*config.logging().format(), LogFormat::Pretty);
    }

    #[test]
    fn test_bad_type_is_config_error() {
        let err = HuntcraftConfig::from_toml_str("[database]\npool_size = \"many\"").unwrap_err();
        assert!(matches!(
            err.kind(),
            huntcraft_error::HuntcraftErrorKind::Config(_)
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = HuntcraftConfig::load_or_default("does/not/exist/huntcraft.toml").unwrap();
        assert_eq!(config, HuntcraftConfig::default());
    }
}
