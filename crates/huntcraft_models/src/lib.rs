//! Story generation gateways for Huntcraft.
//!
//! [`ChatCompletionsGateway`] implements
//! [`StoryGateway`](huntcraft_interface::StoryGateway) over any
//! OpenAI-compatible chat-completions endpoint.

#![warn(missing_docs)]

mod config;
mod openai_compat;
mod prompt;

pub use config::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, GatewayConfig, GatewayConfigBuilder,
};
pub use openai_compat::{
    ChatChoice, ChatCompletionsGateway, ChatMessage, ChatRequest, ChatResponse, ChatUsage,
    from_chat_response, to_chat_request,
};
pub use prompt::{system_prompt, user_prompt};
