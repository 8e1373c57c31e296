//! OpenAI-compatible chat-completions gateway.
//!
//! Sends one system and one user message and returns the first choice's
//! text untouched. Extraction and validation of the story JSON happen
//! downstream.

mod client;
mod conversions;
mod dto;

pub use client::ChatCompletionsGateway;
pub use conversions::{from_chat_response, to_chat_request};
pub use dto::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatUsage};
