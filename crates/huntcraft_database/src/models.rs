//! Diesel models for hunts, stops, stories and options.
//!
//! Rows convert into the core record types with `TryFrom`; enum columns
//! are stored as their SCREAMING_SNAKE_CASE names.

use crate::schema::{hunt_stories, hunts, location_stops, location_story_options};
use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use huntcraft_core::{
    FinalStopMode, Hunt, HuntStatus, HuntStory, HuntUpdate, LocationStop, LocationUpdate,
    NewLocationStop, NewStoryOption, OptionId, PlayOrder, StoryOption,
};
use huntcraft_error::{DatabaseError, DatabaseErrorKind};
use std::fmt::Display;
use uuid::Uuid;

#[track_caller]
fn corrupt_row(table: &str, detail: impl Display) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Serialization(format!(
        "Invalid {} row: {}",
        table, detail
    )))
}

/// Database row for the hunts table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = hunts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HuntRow {
    /// Hunt identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// City the hunt takes place in
    pub city: Option<String>,
    /// Story theme
    pub theme: Option<String>,
    /// Story tone
    pub tone: Option<String>,
    /// Publication state
    pub status: String,
    /// Route ordering rule
    pub play_order: String,
    /// Whether one stop is the finale
    pub final_stop_mode: String,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for the hunts table.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = hunts)]
pub struct NewHuntRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    city: Option<String>,
    theme: Option<String>,
    tone: Option<String>,
    status: String,
    play_order: String,
    final_stop_mode: String,
}

impl From<&Hunt> for NewHuntRow {
    fn from(hunt: &Hunt) -> Self {
        Self {
            id: (*hunt.id()).into(),
            title: hunt.title().clone(),
            description: hunt.description().clone(),
            city: hunt.city().clone(),
            theme: hunt.theme().clone(),
            tone: hunt.tone().clone(),
            status: hunt.status().to_string(),
            play_order: hunt.play_order().to_string(),
            final_stop_mode: hunt.final_stop_mode().to_string(),
        }
    }
}

impl TryFrom<HuntRow> for Hunt {
    type Error = DatabaseError;

    fn try_from(row: HuntRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<HuntStatus>()
            .map_err(|e| corrupt_row("hunts", format!("status {:?}: {}", row.status, e)))?;
        let play_order = row
            .play_order
            .parse::<PlayOrder>()
            .map_err(|e| corrupt_row("hunts", format!("play_order {:?}: {}", row.play_order, e)))?;
        let final_stop_mode = row.final_stop_mode.parse::<FinalStopMode>().map_err(|e| {
            corrupt_row(
                "hunts",
                format!("final_stop_mode {:?}: {}", row.final_stop_mode, e),
            )
        })?;

        Hunt::builder()
            .id(row.id)
            .title(row.title)
            .description(row.description)
            .city(row.city)
            .theme(row.theme)
            .tone(row.tone)
            .status(status)
            .play_order(play_order)
            .final_stop_mode(final_stop_mode)
            .build()
            .map_err(|e| corrupt_row("hunts", e))
    }
}

/// Database row for the location_stops table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = location_stops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LocationStopRow {
    /// Stop identifier
    pub id: Uuid,
    /// Owning hunt
    pub hunt_id: Uuid,
    /// Venue name
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Position in the hunt
    pub order_index: i32,
    /// Whether this is the finale
    pub is_final_stop: bool,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the location_stops table.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = location_stops)]
pub struct NewLocationStopRow {
    id: Uuid,
    hunt_id: Uuid,
    name: String,
    address: Option<String>,
    order_index: i32,
    is_final_stop: bool,
}

impl NewLocationStopRow {
    /// Row for `stop` appended to `hunt_id` at `order_index`.
    pub fn new(hunt_id: Uuid, stop: NewLocationStop, order_index: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            hunt_id,
            name: stop.name().clone(),
            address: stop.address().clone(),
            order_index,
            is_final_stop: *stop.is_final_stop(),
        }
    }
}

/// Partial update for the hunts table. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = hunts)]
pub struct HuntChanges {
    /// New title
    pub title: Option<String>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New city; `Some(None)` clears it
    pub city: Option<Option<String>>,
    /// New default theme; `Some(None)` clears it
    pub theme: Option<Option<String>>,
    /// New default tone; `Some(None)` clears it
    pub tone: Option<Option<String>>,
    /// New play order name
    pub play_order: Option<String>,
    /// New final stop mode name
    pub final_stop_mode: Option<String>,
}

impl HuntChanges {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&HuntUpdate> for HuntChanges {
    fn from(update: &HuntUpdate) -> Self {
        Self {
            title: update.title().clone(),
            description: update.description().clone(),
            city: update.city().clone(),
            theme: update.theme().clone(),
            tone: update.tone().clone(),
            play_order: update.play_order().map(|p| p.to_string()),
            final_stop_mode: update.final_stop_mode().map(|m| m.to_string()),
        }
    }
}

/// Partial update for the location_stops table. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = location_stops)]
pub struct LocationStopChanges {
    /// New venue name
    pub name: Option<String>,
    /// New address; `Some(None)` clears it
    pub address: Option<Option<String>>,
    /// New finale flag
    pub is_final_stop: Option<bool>,
}

impl LocationStopChanges {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.is_final_stop.is_none()
    }
}

impl From<&LocationUpdate> for LocationStopChanges {
    fn from(update: &LocationUpdate) -> Self {
        Self {
            name: update.name().clone(),
            address: update.address().clone(),
            is_final_stop: *update.is_final_stop(),
        }
    }
}

impl TryFrom<LocationStopRow> for LocationStop {
    type Error = DatabaseError;

    fn try_from(row: LocationStopRow) -> Result<Self, Self::Error> {
        LocationStop::builder()
            .id(row.id)
            .hunt_id(row.hunt_id)
            .name(row.name)
            .address(row.address)
            .order_index(row.order_index)
            .is_final_stop(row.is_final_stop)
            .build()
            .map_err(|e| corrupt_row("location_stops", e))
    }
}

/// Database row for the hunt_stories table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = hunt_stories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HuntStoryRow {
    /// Story identifier, stable across regenerations
    pub id: Uuid,
    /// Owning hunt (unique)
    pub hunt_id: Uuid,
    /// First intro scene
    pub intro_scene_1: String,
    /// Second intro scene
    pub intro_scene_2: String,
    /// Third intro scene
    pub intro_scene_3: String,
    /// Template with one blank per stop
    pub final_madlib_template: String,
    /// Theme used for generation
    pub theme: Option<String>,
    /// Tone used for generation
    pub tone: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last regeneration timestamp
    pub updated_at: NaiveDateTime,
}

/// Insertable struct for the hunt_stories table, also used as the upsert changeset.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = hunt_stories)]
pub struct NewHuntStoryRow {
    id: Uuid,
    hunt_id: Uuid,
    intro_scene_1: String,
    intro_scene_2: String,
    intro_scene_3: String,
    final_madlib_template: String,
    theme: Option<String>,
    tone: Option<String>,
}

impl From<&HuntStory> for NewHuntStoryRow {
    fn from(story: &HuntStory) -> Self {
        let [first, second, third] = story.intro_scenes().clone();
        Self {
            id: (*story.id()).into(),
            hunt_id: (*story.hunt_id()).into(),
            intro_scene_1: first,
            intro_scene_2: second,
            intro_scene_3: third,
            final_madlib_template: story.final_madlib_template().clone(),
            theme: story.theme().clone(),
            tone: story.tone().clone(),
        }
    }
}

impl TryFrom<HuntStoryRow> for HuntStory {
    type Error = DatabaseError;

    fn try_from(row: HuntStoryRow) -> Result<Self, Self::Error> {
        HuntStory::builder()
            .id(row.id)
            .hunt_id(row.hunt_id)
            .intro_scenes([row.intro_scene_1, row.intro_scene_2, row.intro_scene_3])
            .final_madlib_template(row.final_madlib_template)
            .theme(row.theme)
            .tone(row.tone)
            .build()
            .map_err(|e| corrupt_row("hunt_stories", e))
    }
}

/// Database row for the location_story_options table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = location_story_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryOptionRow {
    /// Option identifier
    pub id: Uuid,
    /// Stop this option belongs to
    pub location_stop_id: Uuid,
    /// Position among the stop's options, 1 to 3
    pub option_number: i32,
    /// Narrative shown at the stop
    pub story_text: String,
    /// Riddle posed at the stop
    pub riddle_text: String,
    /// Riddle answer
    pub riddle_answer: String,
    /// First hint
    pub hint_1: String,
    /// Second hint
    pub hint_2: String,
    /// Optional third hint
    pub hint_3: Option<String>,
    /// Mad-lib word, always the riddle answer
    pub madlib_word: String,
    /// Whether this is the stop's selection
    pub is_selected: bool,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

/// Insertable struct for the location_story_options table.
///
/// Always inserted unselected, with `madlib_word` copied from the answer.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = location_story_options)]
pub struct NewStoryOptionRow {
    id: Uuid,
    location_stop_id: Uuid,
    option_number: i32,
    story_text: String,
    riddle_text: String,
    riddle_answer: String,
    hint_1: String,
    hint_2: String,
    hint_3: Option<String>,
    madlib_word: String,
    is_selected: bool,
}

impl From<&NewStoryOption> for NewStoryOptionRow {
    fn from(option: &NewStoryOption) -> Self {
        Self {
            id: Uuid::new_v4(),
            location_stop_id: (*option.location_stop_id()).into(),
            option_number: *option.option_number(),
            story_text: option.story_text().clone(),
            riddle_text: option.riddle_text().clone(),
            riddle_answer: option.riddle_answer().clone(),
            hint_1: option.hint_1().clone(),
            hint_2: option.hint_2().clone(),
            hint_3: option.hint_3().clone(),
            madlib_word: option.madlib_word().to_string(),
            is_selected: false,
        }
    }
}

impl TryFrom<StoryOptionRow> for StoryOption {
    type Error = DatabaseError;

    fn try_from(row: StoryOptionRow) -> Result<Self, Self::Error> {
        if row.madlib_word != row.riddle_answer {
            tracing::warn!(
                option_id = %row.id,
                "Stored madlib_word differs from riddle_answer; using the answer"
            );
        }

        let option = NewStoryOption::builder()
            .location_stop_id(row.location_stop_id)
            .option_number(row.option_number)
            .story_text(row.story_text)
            .riddle_text(row.riddle_text)
            .riddle_answer(row.riddle_answer)
            .hint_1(row.hint_1)
            .hint_2(row.hint_2)
            .hint_3(row.hint_3)
            .build()
            .map_err(|e| corrupt_row("location_story_options", e))?;

        Ok(option
            .into_option(OptionId::from(row.id))
            .with_selected(row.is_selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huntcraft_core::{HuntId, LocationId};

    fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    #[test]
    fn test_hunt_row_round_trips_enum_names() {
        let hunt = Hunt::builder()
            .title("Haunted Crawl")
            .status(HuntStatus::Published)
            .play_order(PlayOrder::Linear)
            .build()
            .unwrap();
        let new_row = NewHuntRow::from(&hunt);
        assert_eq!(new_row.status(), "PUBLISHED");
        assert_eq!(new_row.play_order(), "LINEAR");
        assert_eq!(new_row.final_stop_mode(), "HAS_FINAL_STOP");

        let row = HuntRow {
            id: *new_row.id(),
            title: new_row.title().clone(),
            description: None,
            city: None,
            theme: None,
            tone: None,
            status: new_row.status().clone(),
            play_order: new_row.play_order().clone(),
            final_stop_mode: new_row.final_stop_mode().clone(),
            created_at: now(),
            updated_at: now(),
        };
        assert_eq!(Hunt::try_from(row).unwrap(), hunt);
    }

    #[test]
    fn test_unknown_status_is_serialization_error() {
        let row = HuntRow {
            id: Uuid::new_v4(),
            title: "Broken".to_string(),
            description: None,
            city: None,
            theme: None,
            tone: None,
            status: "DELETED".to_string(),
            play_order: "FLEXIBLE".to_string(),
            final_stop_mode: "NO_FINAL_STOP".to_string(),
            created_at: now(),
            updated_at: now(),
        };
        let err = Hunt::try_from(row).unwrap_err();
        assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    }

    #[test]
    fn test_story_row_splits_intro_scenes() {
        let story = HuntStory::builder()
            .hunt_id(HuntId::new())
            .intro_scenes(["one".to_string(), "two".to_string(), "three".to_string()])
            .final_madlib_template("The {{BLANK_1}} waits.")
            .build()
            .unwrap();
        let row = NewHuntStoryRow::from(&story);
        assert_eq!(row.intro_scene_2(), "two");
        assert_eq!(row.id(), story.id().as_uuid());
    }

    #[test]
    fn test_option_row_uses_answer_as_madlib_word() {
        let new_option = NewStoryOption::builder()
            .location_stop_id(LocationId::new())
            .option_number(2)
            .story_text("Smoke curls from the hearth.")
            .riddle_text("I have keys but open no locks.")
            .riddle_answer("piano")
            .hint_1("It plays.")
            .hint_2("Black and white.")
            .build()
            .unwrap();
        let new_row = NewStoryOptionRow::from(&new_option);
        assert_eq!(new_row.madlib_word(), "piano");
        assert!(!new_row.is_selected());

        let row = StoryOptionRow {
            id: *new_row.id(),
            location_stop_id: *new_row.location_stop_id(),
            option_number: 2,
            story_text: new_row.story_text().clone(),
            riddle_text: new_row.riddle_text().clone(),
            riddle_answer: "piano".to_string(),
            hint_1: "It plays.".to_string(),
            hint_2: "Black and white.".to_string(),
            hint_3: None,
            madlib_word: "stale word".to_string(),
            is_selected: true,
            created_at: now(),
        };
        let option = StoryOption::try_from(row).unwrap();
        assert_eq!(option.madlib_word(), "piano");
        assert!(option.is_selected());
    }

    #[test]
    fn test_hunt_changes() {
        assert!(HuntChanges::from(&HuntUpdate::default()).is_empty());

        let update = HuntUpdate::builder()
            .title("Dockside Crawl")
            .city(None::<String>)
            .final_stop_mode(FinalStopMode::NoFinalStop)
            .build()
            .unwrap();
        let changes = HuntChanges::from(&update);
        assert_eq!(changes.title.as_deref(), Some("Dockside Crawl"));
        assert_eq!(changes.city, Some(None));
        assert_eq!(changes.description, None);
        assert_eq!(changes.final_stop_mode.as_deref(), Some("NO_FINAL_STOP"));
        assert_eq!(changes.play_order, None);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_empty_changes() {
        assert!(LocationStopChanges::from(&LocationUpdate::default()).is_empty());
        let changes = LocationStopChanges::from(
            &LocationUpdate::builder()
                .address(None::<String>)
                .build()
                .unwrap(),
        );
        assert_eq!(changes.address, Some(None));
        assert!(!changes.is_empty());
    }
}
