//! Typed shape of the generated story JSON.
//!
//! Field names are camelCase; the snake_case names used by older prompts
//! are accepted as aliases.

use huntcraft_core::INTRO_SCENE_COUNT;
use serde::Deserialize;

/// Parsed generation output, not yet validated against the hunt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryPayload {
    #[serde(alias = "intro_scenes")]
    intro_scenes: [String; INTRO_SCENE_COUNT],
    #[serde(
        alias = "final_template",
        alias = "finalMadlibTemplate",
        alias = "final_madlib_template"
    )]
    final_template: String,
    #[serde(default, alias = "blank_definitions")]
    blank_definitions: Vec<BlankDefinition>,
    locations: Vec<PayloadLocation>,
}

/// Description of one keyed blank in the template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct BlankDefinition {
    key: String,
    #[serde(default)]
    description: Option<String>,
}

/// Generated options for one location.
///
/// The id is kept as text; matching against the hunt's stops happens
/// during assembly so unknown ids can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLocation {
    #[serde(alias = "location_id")]
    location_id: String,
    #[serde(default, alias = "location_name")]
    location_name: Option<String>,
    options: Vec<PayloadOption>,
}

/// One generated candidate for a location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct PayloadOption {
    #[serde(alias = "story_text")]
    story_text: String,
    #[serde(alias = "riddle_text")]
    riddle_text: String,
    #[serde(alias = "riddle_answer")]
    riddle_answer: String,
    #[serde(default, alias = "blank_key")]
    blank_key: Option<String>,
    #[serde(alias = "hint_1")]
    hint1: String,
    #[serde(alias = "hint_2")]
    hint2: String,
    #[serde(default, alias = "hint_3")]
    hint3: Option<String>,
    /// Ignored on assembly; the riddle answer fills the blank
    #[serde(default, alias = "madlib_word")]
    madlib_word: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_aliases() {
        let json = r#"{
            "intro_scenes": ["a", "b", "c"],
            "final_madlib_template": "The ____ waits.",
            "locations": [{
                "location_id": "abc",
                "options": [{
                    "story_text": "s", "riddle_text": "r", "riddle_answer": "key",
                    "hint_1": "h1", "hint_2": "h2", "madlib_word": "lock"
                }]
            }]
        }"#;
        let payload: StoryPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.final_template(), "The ____ waits.");
        assert!(payload.blank_definitions().is_empty());
        let option = &payload.locations()[0].options()[0];
        assert_eq!(option.hint1(), "h1");
        assert_eq!(option.madlib_word().as_deref(), Some("lock"));
    }

    #[test]
    fn test_intro_scene_arity() {
        let json = r#"{"introScenes": ["a", "b"], "finalTemplate": "", "locations": []}"#;
        assert!(serde_json::from_str::<StoryPayload>(json).is_err());
    }
}
