//! Hunt records and their settings.

use crate::HuntId;
use serde::{Deserialize, Serialize};

/// Publication state of a hunt.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum HuntStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Whether players must visit stops in sequence.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PlayOrder {
    /// Players choose their own route
    #[default]
    Flexible,
    /// Players follow the stop order
    Linear,
}

/// Whether one stop is the grand finale.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum FinalStopMode {
    #[default]
    HasFinalStop,
    NoFinalStop,
}

/// Audience rating passed to generation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum AgeRating {
    #[default]
    #[serde(rename = "PG-13")]
    #[strum(to_string = "PG-13", serialize = "pg13")]
    Pg13,
    #[serde(rename = "R")]
    #[strum(to_string = "R", serialize = "r")]
    R,
}

/// A themed set of location stops.
///
/// # Examples
///
/// ```
/// use huntcraft_core::{Hunt, HuntStatus};
///
/// let hunt = Hunt::builder()
///     .title("Haunted Bar Crawl")
///     .theme(Some("haunted".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(*hunt.status(), HuntStatus::Draft);
/// ```
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
pub struct Hunt {
    #[builder(default)]
    id: HuntId,
    title: String,
    #[builder(default)]
    description: Option<String>,
    #[builder(default)]
    city: Option<String>,
    #[builder(default)]
    theme: Option<String>,
    #[builder(default)]
    tone: Option<String>,
    #[builder(default)]
    status: HuntStatus,
    #[builder(default)]
    play_order: PlayOrder,
    #[builder(default)]
    final_stop_mode: FinalStopMode,
}

impl Hunt {
    /// Returns a builder for constructing a Hunt.
    pub fn builder() -> HuntBuilder {
        HuntBuilder::default()
    }

    /// Applies the non-empty fields of an update.
    pub fn apply(&mut self, update: &HuntUpdate) {
        if let Some(title) = update.title() {
            self.title = title.clone();
        }
        if let Some(description) = update.description() {
            self.description = description.clone();
        }
        if let Some(city) = update.city() {
            self.city = city.clone();
        }
        if let Some(theme) = update.theme() {
            self.theme = theme.clone();
        }
        if let Some(tone) = update.tone() {
            self.tone = tone.clone();
        }
        if let Some(play_order) = update.play_order() {
            self.play_order = *play_order;
        }
        if let Some(final_stop_mode) = update.final_stop_mode() {
            self.final_stop_mode = *final_stop_mode;
        }
    }
}

/// Partial edit of a hunt's details and route settings. `None` leaves the
/// field unchanged; `Some(None)` clears an optional text field.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default, setter(into, strip_option))]
pub struct HuntUpdate {
    title: Option<String>,
    description: Option<Option<String>>,
    city: Option<Option<String>>,
    theme: Option<Option<String>>,
    tone: Option<Option<String>>,
    play_order: Option<PlayOrder>,
    final_stop_mode: Option<FinalStopMode>,
}

impl HuntUpdate {
    /// Returns a builder for constructing a HuntUpdate.
    pub fn builder() -> HuntUpdateBuilder {
        HuntUpdateBuilder::default()
    }

    /// Update that only changes the route settings.
    pub fn settings(play_order: PlayOrder, final_stop_mode: FinalStopMode) -> Self {
        Self {
            play_order: Some(play_order),
            final_stop_mode: Some(final_stop_mode),
            ..Self::default()
        }
    }

    /// True when applying the update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
