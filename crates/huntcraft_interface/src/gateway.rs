//! Story generation gateway trait.

use async_trait::async_trait;
use huntcraft_core::GenerationRequest;
use huntcraft_error::GatewayError;

/// Text-generation backend that writes a hunt's story.
///
/// Returns the model's raw text. The text is untrusted: it is expected to
/// hold one JSON object, possibly inside a fenced code block, and callers
/// must extract and validate it. Implementations make exactly one attempt;
/// retrying is the caller's decision.
#[async_trait]
pub trait StoryGateway: Send + Sync {
    /// Generates story text for the request.
    async fn generate_story(&self, request: &GenerationRequest) -> Result<String, GatewayError>;

    /// Name used in logs.
    fn provider_name(&self) -> &str;
}
