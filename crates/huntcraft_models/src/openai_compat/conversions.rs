//! Conversions between generation requests and the chat-completions format.

use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse};
use crate::{GatewayConfig, system_prompt, user_prompt};
use huntcraft_core::GenerationRequest;
use huntcraft_error::{GatewayError, GatewayErrorKind};
use tracing::debug;

/// Builds the system + user chat request for a story generation.
pub fn to_chat_request(req: &GenerationRequest, config: &GatewayConfig) -> ChatRequest {
    ChatRequest::new(
        config.model().clone(),
        vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(user_prompt(req)),
        ],
        *config.temperature(),
    )
}

/// Text of the first choice.
pub fn from_chat_response(response: &ChatResponse) -> Result<String, GatewayError> {
    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = ?usage.prompt_tokens,
            completion_tokens = ?usage.completion_tokens,
            total_tokens = ?usage.total_tokens,
            "Token usage"
        );
    }

    let choice = response.choices.first().ok_or_else(|| {
        GatewayError::new(GatewayErrorKind::ResponseParsing(
            "No choices in response".to_string(),
        ))
    })?;

    if choice.message.content.trim().is_empty() {
        return Err(GatewayError::new(GatewayErrorKind::ResponseParsing(format!(
            "Empty completion (finish reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))));
    }

    Ok(choice.message.content.clone())
}
