//! Core data types for the Huntcraft story engine.
//!
//! Hunts own ordered location stops and at most one generated story; each
//! stop owns up to three story options, one of which the host may select.

mod hunt;
mod ids;
mod location;
mod request;
mod story;

pub use hunt::{
    AgeRating, FinalStopMode, Hunt, HuntBuilder, HuntStatus, HuntUpdate, HuntUpdateBuilder,
    PlayOrder,
};
pub use ids::{HuntId, LocationId, OptionId, StoryId};
pub use location::{
    LocationStop, LocationStopBuilder, LocationUpdate, LocationUpdateBuilder, NewLocationStop,
    NewLocationStopBuilder, next_order_index,
};
pub use request::{GenerationLocation, GenerationRequest, GenerationRequestBuilder};
pub use story::{
    HuntStory, HuntStoryBuilder, INTRO_SCENE_COUNT, MAX_OPTIONS_PER_LOCATION, NewStoryOption,
    NewStoryOptionBuilder, StoryOption,
};
