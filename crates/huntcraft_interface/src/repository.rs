//! Record store traits for hunts, stops, stories and options.

use async_trait::async_trait;
use huntcraft_core::{
    Hunt, HuntId, HuntStory, HuntUpdate, LocationId, LocationStop, LocationUpdate,
    NewLocationStop, NewStoryOption, StoryOption,
};
use huntcraft_error::HuntcraftResult;
use serde::Serialize;

/// Store for hunts and their ordered location stops.
///
/// Implementations report missing records as `StoryErrorKind::HuntNotFound`
/// or `StoryErrorKind::LocationNotFound`.
#[async_trait]
pub trait HuntRepository: Send + Sync {
    /// Stores a new hunt.
    async fn create_hunt(&self, hunt: Hunt) -> HuntcraftResult<Hunt>;

    /// Loads a hunt by id.
    async fn get_hunt(&self, id: HuntId) -> HuntcraftResult<Hunt>;

    /// Edits a hunt's details and route settings in one write.
    async fn update_hunt(&self, id: HuntId, update: &HuntUpdate) -> HuntcraftResult<Hunt>;

    /// Stops of a hunt ordered by `order_index`.
    async fn list_locations(&self, hunt_id: HuntId) -> HuntcraftResult<Vec<LocationStop>>;

    /// Loads one stop.
    async fn get_location(&self, id: LocationId) -> HuntcraftResult<LocationStop>;

    /// Appends a stop; its `order_index` is one past the hunt's current maximum.
    async fn add_location(
        &self,
        hunt_id: HuntId,
        stop: NewLocationStop,
    ) -> HuntcraftResult<LocationStop>;

    /// Edits a stop's name, address or final-stop flag.
    async fn update_location(
        &self,
        id: LocationId,
        update: &LocationUpdate,
    ) -> HuntcraftResult<LocationStop>;

    /// Removes a stop and its options. Remaining stops keep their indices.
    async fn delete_location(&self, id: LocationId) -> HuntcraftResult<()>;
}

/// One generation's worth of story state, written as a single unit.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StoryReplacement {
    story: HuntStory,
    location_ids: Vec<LocationId>,
    options: Vec<NewStoryOption>,
}

impl StoryReplacement {
    /// Bundles a story with the options that replace those of `location_ids`.
    pub fn new(
        story: HuntStory,
        location_ids: Vec<LocationId>,
        options: Vec<NewStoryOption>,
    ) -> Self {
        Self {
            story,
            location_ids,
            options,
        }
    }
}

/// What a replacement wrote, and which selections it threw away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct ReplacementReceipt {
    story: HuntStory,
    options: Vec<StoryOption>,
    discarded_selections: Vec<LocationId>,
}

impl ReplacementReceipt {
    /// Creates a receipt.
    pub fn new(
        story: HuntStory,
        options: Vec<StoryOption>,
        discarded_selections: Vec<LocationId>,
    ) -> Self {
        Self {
            story,
            options,
            discarded_selections,
        }
    }

    /// Splits the receipt into its parts.
    pub fn into_parts(self) -> (HuntStory, Vec<StoryOption>, Vec<LocationId>) {
        (self.story, self.options, self.discarded_selections)
    }
}

/// Store for generated stories and their options.
///
/// `replace_story` and `select_option` are the two operations whose
/// effects must land together; implementations run each as one
/// transaction.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// The hunt's story, if one was generated.
    async fn get_story(&self, hunt_id: HuntId) -> HuntcraftResult<Option<HuntStory>>;

    /// Options for the given stops, grouped in the order of `location_ids`
    /// and sorted by `option_number` within each stop.
    async fn list_options(&self, location_ids: &[LocationId])
    -> HuntcraftResult<Vec<StoryOption>>;

    /// Upserts the story by hunt id, deletes every option of the listed
    /// stops, and inserts the new options unselected.
    async fn replace_story(
        &self,
        replacement: StoryReplacement,
    ) -> HuntcraftResult<ReplacementReceipt>;

    /// Makes `option_number` the only selected option of the stop.
    ///
    /// Fails with `StoryErrorKind::UnknownOption` and changes nothing when
    /// the stop has no such option.
    async fn select_option(
        &self,
        location_id: LocationId,
        option_number: i32,
    ) -> HuntcraftResult<StoryOption>;

    /// Leaves the stop with no selected option.
    async fn clear_selection(&self, location_id: LocationId) -> HuntcraftResult<()>;
}
