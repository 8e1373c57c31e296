//! Generated hunt stories and per-location story options.

use crate::{HuntId, LocationId, OptionId, StoryId};
use serde::{Deserialize, Serialize};

/// Number of candidate options generated per location.
pub const MAX_OPTIONS_PER_LOCATION: usize = 3;

/// Number of intro scenes in every story.
pub const INTRO_SCENE_COUNT: usize = 3;

/// The narrative frame of a hunt: intro scenes and the final mad-lib template.
///
/// One per hunt; regeneration replaces it wholesale.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct HuntStory {
    #[builder(default)]
    id: StoryId,
    hunt_id: HuntId,
    intro_scenes: [String; INTRO_SCENE_COUNT],
    final_madlib_template: String,
    #[builder(default)]
    theme: Option<String>,
    #[builder(default)]
    tone: Option<String>,
}

impl HuntStory {
    /// Returns a builder for constructing a HuntStory.
    pub fn builder() -> HuntStoryBuilder {
        HuntStoryBuilder::default()
    }

    /// Keeps this story's id while taking every other field from `next`.
    ///
    /// Used by stores when upserting by hunt id.
    pub fn replaced_by(&self, next: HuntStory) -> HuntStory {
        HuntStory { id: self.id, ..next }
    }
}

/// A candidate option before it is stored.
///
/// There is no separate blank-filler field: the riddle answer is the word
/// that fills this location's blank.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct NewStoryOption {
    location_stop_id: LocationId,
    option_number: i32,
    story_text: String,
    riddle_text: String,
    riddle_answer: String,
    hint_1: String,
    hint_2: String,
    #[builder(default)]
    hint_3: Option<String>,
}

impl NewStoryOption {
    /// Returns a builder for constructing a NewStoryOption.
    pub fn builder() -> NewStoryOptionBuilder {
        NewStoryOptionBuilder::default()
    }

    /// The word this option contributes to the mad-lib.
    pub fn madlib_word(&self) -> &str {
        &self.riddle_answer
    }

    /// Turns this candidate into a stored, unselected option.
    pub fn into_option(self, id: OptionId) -> StoryOption {
        StoryOption {
            id,
            madlib_word: self.riddle_answer.clone(),
            location_stop_id: self.location_stop_id,
            option_number: self.option_number,
            story_text: self.story_text,
            riddle_text: self.riddle_text,
            riddle_answer: self.riddle_answer,
            hint_1: self.hint_1,
            hint_2: self.hint_2,
            hint_3: self.hint_3,
            is_selected: false,
        }
    }
}

/// A stored candidate narrative/riddle for one location.
///
/// Only constructible from a [`NewStoryOption`], so `madlib_word` always
/// equals `riddle_answer`.
///
/// # Examples
///
/// ```
/// use huntcraft_core::{LocationId, NewStoryOption, OptionId};
///
/// let option = NewStoryOption::builder()
///     .location_stop_id(LocationId::new())
///     .option_number(2)
///     .story_text("A draft blows from behind the bar.")
///     .riddle_text("I open locks but never doors.")
///     .riddle_answer("brass key")
///     .hint_1("It's metal.")
///     .hint_2("It jingles.")
///     .build()
///     .unwrap()
///     .into_option(OptionId::new());
///
/// assert_eq!(option.madlib_word(), "brass key");
/// assert!(!option.is_selected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct StoryOption {
    id: OptionId,
    location_stop_id: LocationId,
    option_number: i32,
    story_text: String,
    riddle_text: String,
    riddle_answer: String,
    hint_1: String,
    hint_2: String,
    hint_3: Option<String>,
    #[getter(skip)]
    madlib_word: String,
    #[getter(skip)]
    is_selected: bool,
}

impl StoryOption {
    /// The word this option fills into the mad-lib when selected.
    pub fn madlib_word(&self) -> &str {
        &self.madlib_word
    }

    /// Whether this is the location's current selection.
    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Marks or unmarks this option as the location's selection.
    pub fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    /// Same option with the given selection flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }
}
