//! Story gateway over an OpenAI-compatible chat-completions API.

use crate::GatewayConfig;
use crate::openai_compat::{ChatResponse, conversions};
use async_trait::async_trait;
use huntcraft_core::GenerationRequest;
use huntcraft_error::{GatewayError, GatewayErrorKind};
use huntcraft_interface::StoryGateway;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Story gateway for any OpenAI-compatible chat-completions endpoint.
///
/// Makes exactly one request per generation. HTTP 429 maps to
/// `RateLimited`, 402 to `QuotaExhausted`, any other failure to a
/// generic gateway error.
#[derive(Debug, Clone)]
pub struct ChatCompletionsGateway {
    client: Client,
    api_key: String,
    config: GatewayConfig,
}

impl ChatCompletionsGateway {
    /// Creates a gateway with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    #[instrument(skip(api_key, config), fields(model = %config.model(), url = %config.base_url()))]
    pub fn new(api_key: impl Into<String>, config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                GatewayError::new(GatewayErrorKind::Transport(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        debug!("Created chat-completions gateway");

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Creates a gateway reading the API key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when the variable is unset or blank.
    pub fn from_env(config: GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = config.api_key_from_env()?;
        Self::new(api_key, config)
    }

    /// Returns the gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        self.config.model()
    }
}

#[async_trait]
impl StoryGateway for ChatCompletionsGateway {
    #[instrument(skip(self, request), fields(hunt_id = %request.hunt_id(), model = %self.config.model()))]
    async fn generate_story(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let chat_request = conversions::to_chat_request(request, &self.config);

        debug!(
            message_count = chat_request.messages().len(),
            locations = request.locations().len(),
            "Sending request"
        );

        let response = self
            .client
            .post(self.config.base_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                let detail = if e.is_timeout() {
                    format!("Request timed out: {}", e)
                } else {
                    format!("Request failed: {}", e)
                };
                GatewayError::new(GatewayErrorKind::Transport(detail))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(GatewayError::new(GatewayErrorKind::from_status(
                status.as_u16(),
                error_text,
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            GatewayError::new(GatewayErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");

        conversions::from_chat_response(&chat_response)
    }

    fn provider_name(&self) -> &str {
        "chat-completions"
    }
}
