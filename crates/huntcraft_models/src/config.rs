//! Gateway configuration.

use huntcraft_error::{GatewayError, GatewayErrorKind};
use serde::{Deserialize, Serialize};

/// Chat-completions endpoint used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Environment variable holding the API key when none is configured.
pub const DEFAULT_API_KEY_ENV: &str = "HUNTCRAFT_API_KEY";

/// Settings for the chat-completions gateway.
///
/// Deserialises from the `[gateway]` table of the configuration file;
/// every field is optional there.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct GatewayConfig {
    /// Full URL of the chat-completions endpoint
    base_url: String,
    /// Model identifier sent with every request
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Request timeout in seconds
    timeout_secs: u64,
    /// Environment variable holding the API key
    api_key_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.9,
            timeout_secs: 120,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Returns a builder for constructing a GatewayConfig.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Reads the API key from the configured environment variable.
    ///
    /// An unset or blank variable is a `MissingApiKey` error.
    pub fn api_key_from_env(&self) -> Result<String, GatewayError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GatewayError::new(GatewayErrorKind::MissingApiKey(self.api_key_env.clone()))
            })
    }
}
