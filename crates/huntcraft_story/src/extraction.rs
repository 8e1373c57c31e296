//! Pull the JSON object out of free-form model output.
//!
//! Models wrap their answer in fenced code blocks or chat around it. The
//! text is treated as untrusted: take the first fenced block if there is
//! one, then the first complete `{...}` value, then parse into
//! [`StoryPayload`].

use crate::StoryPayload;
use huntcraft_error::StoryError;
use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:[A-Za-z]+)?[ \t]*\r?\n?(.*?)```").expect("fenced block pattern is valid")
});

/// Slice of `text` holding the candidate JSON object.
///
/// # Examples
///
/// ```
/// use huntcraft_story::extract_json;
///
/// let text = "Here you go:\n```json\n{\"a\": 1}\n```\nEnjoy!";
/// assert_eq!(extract_json(text).unwrap(), "{\"a\": 1}");
/// ```
pub fn extract_json(text: &str) -> Result<&str, StoryError> {
    let fenced = FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    fenced
        .and_then(first_object)
        .or_else(|| first_object(text))
        .ok_or_else(|| StoryError::malformed("no JSON object found in generated text"))
}

/// First `{` that opens a complete JSON object, sliced to where it closes.
fn first_object(text: &str) -> Option<&str> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut values =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
        match values.next() {
            Some(Ok(serde_json::Value::Object(_))) => {
                Some(&text[start..start + values.byte_offset()])
            }
            _ => None,
        }
    })
}

/// Extracts and parses a story payload.
///
/// Any shape mismatch, including the wrong number of intro scenes, is
/// reported as `MalformedPayload` carrying the parser's message.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_payload(text: &str) -> Result<StoryPayload, StoryError> {
    let json = extract_json(text)?;
    tracing::debug!(json_len = json.len(), "Extracted JSON object");
    serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, "Generated JSON does not match the story payload shape");
        StoryError::malformed(format!("payload does not match the story shape: {}", e))
    })
}
