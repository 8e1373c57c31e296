//! Prompt text for story generation.

use huntcraft_core::{FinalStopMode, GenerationRequest, PlayOrder};
use std::fmt::Write;

const SYSTEM_PROMPT: &str = r#"You are a creative storyteller creating interactive treasure hunt narratives for bar crawls and social adventures.

Create engaging, theme-appropriate stories that:
- Match the specified theme and tone
- Are appropriate for the age rating
- Include riddles that relate to the location names
- Have a cohesive narrative arc across all locations
- End with a mad-lib style finale where each location's riddle answer fills one blank

Your output must be valid JSON matching this exact structure:
{
  "introScenes": ["scene 1", "scene 2", "scene 3"],
  "finalTemplate": "Template with one {{BLANK_1}} style marker per location",
  "blankDefinitions": [
    { "key": "BLANK_1", "description": "what kind of word fills this blank" }
  ],
  "locations": [
    {
      "locationId": "uuid",
      "locationName": "name",
      "options": [
        {
          "storyText": "Scene at this location",
          "riddleText": "A riddle about the location",
          "riddleAnswer": "the word that fills this location's blank",
          "blankKey": "BLANK_1",
          "hint1": "first hint",
          "hint2": "second hint",
          "hint3": "optional third hint"
        }
      ]
    }
  ]
}"#;

/// Fixed instructions describing the JSON shape the model must return.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Request-specific instructions: theme, tone, rating, stops and settings.
///
/// # Examples
///
/// ```
/// use huntcraft_core::{GenerationLocation, GenerationRequest, HuntId, LocationId};
/// use huntcraft_models::user_prompt;
///
/// let request = GenerationRequest::builder()
///     .hunt_id(HuntId::new())
///     .theme("pirate")
///     .tone("rowdy")
///     .locations(vec![GenerationLocation::new(LocationId::new(), "The Anchor")])
///     .build()
///     .unwrap();
///
/// let prompt = user_prompt(&request);
/// assert!(prompt.contains("1. The Anchor"));
/// assert!(prompt.contains("{{BLANK_1}}"));
/// ```
pub fn user_prompt(request: &GenerationRequest) -> String {
    let count = request.locations().len();
    let mut prompt = format!(
        "Create a {} themed treasure hunt story with a {} tone ({} rating).\n\n",
        request.theme(),
        request.tone(),
        request.age_rating()
    );

    if let Some(notes) = request
        .custom_notes()
        .as_deref()
        .filter(|n| !n.trim().is_empty())
    {
        let _ = writeln!(prompt, "Custom requirements: {}\n", notes.trim());
    }

    prompt.push_str("Locations (in order):\n");
    for (i, location) in request.locations().iter().enumerate() {
        let _ = writeln!(prompt, "{}. {} (ID: {})", i + 1, location.name(), location.id());
    }

    let order = match request.play_order() {
        PlayOrder::Flexible => "Players may visit the locations in any order.",
        PlayOrder::Linear => "Players visit the locations in the order listed.",
    };
    let finale = match request.final_stop_mode() {
        FinalStopMode::HasFinalStop => "The last location is the grand finale.",
        FinalStopMode::NoFinalStop => "There is no special final location.",
    };
    let _ = write!(prompt, "\n{}\n{}\n\n", order, finale);

    let markers = (1..=count)
        .map(|n| format!("{{{{BLANK_{}}}}}", n))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(
        prompt,
        "Generate:\n\
         1. THREE different intro scenes that set the mood and story\n\
         2. A mad-lib style final template with exactly {} blanks, written as {}\n\
         3. For EACH location, create THREE distinct options, each with:\n   \
         - A story moment specific to that location\n   \
         - A riddle tied to the theme and location name\n   \
         - The riddle answer, a single word or short phrase that fills that location's blank\n   \
         - Two helpful hints\n\n\
         Use each location's ID exactly as given. Make each option unique and creative. \
         Return ONLY valid JSON.",
        count, markers
    );

    prompt
}
