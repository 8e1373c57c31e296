//! Story assembly: validate generated output and persist it as one unit.
//!
//! Every check runs before the store is touched. A payload that fails
//! any of them leaves the hunt's existing story and options exactly as
//! they were.

use crate::{StoryPayload, distinct_blank_count, parse_payload, template_keys};
use huntcraft_core::{
    GenerationLocation, GenerationRequest, HuntId, HuntStory, LocationId,
    MAX_OPTIONS_PER_LOCATION, NewStoryOption, StoryOption,
};
use huntcraft_error::{HuntcraftResult, StoryError, StoryErrorKind};
use huntcraft_interface::{StoryReplacement, StoryRepository};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// The hunt and stops a payload was generated for.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct AssemblyContext {
    /// Hunt the story belongs to
    hunt_id: HuntId,
    /// Stops passed to generation, in play order
    locations: Vec<GenerationLocation>,
    /// Theme recorded on the stored story
    #[builder(default)]
    theme: Option<String>,
    /// Tone recorded on the stored story
    #[builder(default)]
    tone: Option<String>,
}

impl AssemblyContext {
    /// Returns a builder for constructing an AssemblyContext.
    pub fn builder() -> AssemblyContextBuilder {
        AssemblyContextBuilder::default()
    }

    /// Context matching the request that produced the payload.
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            hunt_id: *request.hunt_id(),
            locations: request.locations().clone(),
            theme: Some(request.theme().clone()),
            tone: Some(request.tone().clone()),
        }
    }

    fn location_ids(&self) -> Vec<LocationId> {
        self.locations.iter().map(|l| *l.id()).collect()
    }
}

/// A payload that passed every check, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ValidatedStory {
    story: HuntStory,
    location_ids: Vec<LocationId>,
    options: Vec<NewStoryOption>,
}

impl ValidatedStory {
    /// The write unit for the store.
    pub fn into_replacement(self) -> StoryReplacement {
        StoryReplacement::new(self.story, self.location_ids, self.options)
    }
}

/// Non-fatal conditions reported alongside a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssemblyWarning {
    /// Regeneration dropped the host's selection at these stops
    SelectionsDiscarded(Vec<LocationId>),
}

impl std::fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssemblyWarning::SelectionsDiscarded(locations) => write!(
                f,
                "Regeneration discarded the selected option at {} location(s)",
                locations.len()
            ),
        }
    }
}

/// Result of a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct AssemblyOutcome {
    story: HuntStory,
    options: Vec<StoryOption>,
    discarded_selections: Vec<LocationId>,
    warnings: Vec<AssemblyWarning>,
}

impl AssemblyOutcome {
    /// True when regeneration threw away at least one selection.
    pub fn discarded_any(&self) -> bool {
        !self.discarded_selections.is_empty()
    }
}

/// Validates generated payloads and persists them through a [`StoryRepository`].
pub struct StoryAssembler<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for StoryAssembler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> StoryAssembler<S>
where
    S: StoryRepository + ?Sized,
{
    /// Creates an assembler writing to `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Parses, validates and persists `raw` for the hunt in `context`.
    ///
    /// Replaces the hunt's story and every option of the context's stops.
    /// Selections that existed before are lost; they are listed in the
    /// outcome and logged as a warning.
    #[instrument(
        skip(self, context, raw),
        fields(hunt_id = %context.hunt_id(), locations = context.locations().len())
    )]
    pub async fn assemble(
        &self,
        context: &AssemblyContext,
        raw: &str,
    ) -> HuntcraftResult<AssemblyOutcome> {
        let payload = parse_payload(raw)?;
        let validated = validate_payload(context, &payload)?;
        debug!(
            options = validated.options().len(),
            "Payload validated, replacing story"
        );

        let receipt = self
            .store
            .replace_story(validated.into_replacement())
            .await
            .inspect_err(|e| error!(error = %e, "Story replacement failed"))?;
        let (story, options, discarded_selections) = receipt.into_parts();

        let mut warnings = Vec::new();
        if !discarded_selections.is_empty() {
            warn!(
                discarded = discarded_selections.len(),
                "Regeneration discarded existing selections"
            );
            warnings.push(AssemblyWarning::SelectionsDiscarded(
                discarded_selections.clone(),
            ));
        }

        info!(
            story_id = %story.id(),
            options = options.len(),
            "Story assembled"
        );

        Ok(AssemblyOutcome {
            story,
            options,
            discarded_selections,
            warnings,
        })
    }
}

/// Runs every check on a parsed payload without touching storage.
///
/// Checks run in order: per-location structure, blank count against the
/// number of stops, then the stop mapping.
#[instrument(skip_all, fields(hunt_id = %context.hunt_id()))]
pub fn validate_payload(
    context: &AssemblyContext,
    payload: &StoryPayload,
) -> Result<ValidatedStory, StoryError> {
    check_structure(payload)?;

    let expected = context.locations().len();
    let found = distinct_blank_count(payload.final_template());
    if found != expected {
        error!(expected, found, "Template blank count does not match stops");
        return Err(StoryError::new(StoryErrorKind::BlankCountMismatch {
            expected,
            found,
        }));
    }

    let by_location = map_locations(context, payload)?;

    let story = HuntStory::builder()
        .hunt_id(*context.hunt_id())
        .intro_scenes(payload.intro_scenes().clone())
        .final_madlib_template(payload.final_template().clone())
        .theme(context.theme().clone())
        .tone(context.tone().clone())
        .build()
        .map_err(|e| StoryError::malformed(format!("story could not be built: {}", e)))?;

    let mut options = Vec::new();
    for location in context.locations() {
        let Some(entry) = by_location.get(location.id()) else {
            continue;
        };
        for (index, option) in entry.options().iter().enumerate() {
            if let Some(word) = option.madlib_word()
                && word != option.riddle_answer()
            {
                debug!(
                    location_id = %location.id(),
                    sent = %word,
                    answer = %option.riddle_answer(),
                    "Ignoring generated madlib word that differs from the answer"
                );
            }

            let option = NewStoryOption::builder()
                .location_stop_id(*location.id())
                .option_number((index + 1) as i32)
                .story_text(option.story_text().clone())
                .riddle_text(option.riddle_text().clone())
                .riddle_answer(option.riddle_answer().trim())
                .hint_1(option.hint1().clone())
                .hint_2(option.hint2().clone())
                .hint_3(option.hint3().clone())
                .build()
                .map_err(|e| StoryError::malformed(format!("option could not be built: {}", e)))?;
            options.push(option);
        }
    }

    Ok(ValidatedStory {
        story,
        location_ids: context.location_ids(),
        options,
    })
}

fn check_structure(payload: &StoryPayload) -> Result<(), StoryError> {
    let template_keys: HashSet<String> = template_keys(payload.final_template())
        .into_iter()
        .collect();

    let mut defined = HashSet::new();
    for definition in payload.blank_definitions() {
        let key = definition.key().trim();
        if !template_keys.contains(key) {
            return Err(StoryError::malformed(format!(
                "blank definition '{}' does not appear in the template",
                key
            )));
        }
        defined.insert(key);
    }

    let mut seen = HashSet::new();
    for location in payload.locations() {
        let id = location.location_id();
        if !seen.insert(id.trim().to_ascii_lowercase()) {
            return Err(StoryError::malformed(format!(
                "location {} appears more than once",
                id
            )));
        }

        let count = location.options().len();
        if count == 0 || count > MAX_OPTIONS_PER_LOCATION {
            return Err(StoryError::malformed(format!(
                "location {} has {} options, expected 1 to {}",
                id, count, MAX_OPTIONS_PER_LOCATION
            )));
        }

        for (index, option) in location.options().iter().enumerate() {
            if option.riddle_answer().trim().is_empty() {
                return Err(StoryError::malformed(format!(
                    "option {} of location {} has an empty riddle answer",
                    index + 1,
                    id
                )));
            }
            if let Some(key) = option.blank_key()
                && !defined.is_empty()
                && !defined.contains(key.trim())
            {
                return Err(StoryError::malformed(format!(
                    "option {} of location {} refers to undefined blank '{}'",
                    index + 1,
                    id,
                    key
                )));
            }
        }
    }

    Ok(())
}

fn map_locations<'a>(
    context: &AssemblyContext,
    payload: &'a StoryPayload,
) -> Result<HashMap<LocationId, &'a crate::PayloadLocation>, StoryError> {
    let expected: HashSet<LocationId> = context.location_ids().into_iter().collect();

    let mut by_location = HashMap::new();
    let mut unexpected = Vec::new();
    for location in payload.locations() {
        match location.location_id().trim().parse::<LocationId>() {
            Ok(id) if expected.contains(&id) => {
                by_location.insert(id, location);
            }
            _ => unexpected.push(location.location_id().clone()),
        }
    }

    let missing: Vec<String> = context
        .locations()
        .iter()
        .filter(|l| !by_location.contains_key(l.id()))
        .map(|l| l.id().to_string())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        error!(?missing, ?unexpected, "Payload locations do not match stops");
        return Err(StoryError::new(StoryErrorKind::UnmappedLocation {
            missing,
            unexpected,
        }));
    }

    Ok(by_location)
}
