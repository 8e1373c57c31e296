//! Read-side view of a hunt's story: scenes, options per stop, and the
//! rendered mad-lib.

use crate::{LocationOptions, RenderStyle, RenderedMadlib, group_options, render_with, words_for};
use huntcraft_core::{HuntId, HuntStory, LocationId};
use huntcraft_error::HuntcraftResult;
use huntcraft_interface::{HuntRepository, StoryRepository};
use serde::Serialize;
use tracing::instrument;

/// A hunt's story with every stop's options, as a host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct StoryBoard {
    story: HuntStory,
    locations: Vec<LocationOptions>,
}

impl StoryBoard {
    /// Loads the board, or `None` when the hunt has no story yet.
    ///
    /// Loading never writes.
    #[instrument(skip(hunts, stories), fields(hunt_id = %hunt_id))]
    pub async fn load<H, S>(hunts: &H, stories: &S, hunt_id: HuntId) -> HuntcraftResult<Option<Self>>
    where
        H: HuntRepository + ?Sized,
        S: StoryRepository + ?Sized,
    {
        let Some(story) = stories.get_story(hunt_id).await? else {
            return Ok(None);
        };
        let locations = hunts.list_locations(hunt_id).await?;
        let ids: Vec<LocationId> = locations.iter().map(|l| *l.id()).collect();
        let options = stories.list_options(&ids).await?;
        Ok(Some(Self {
            story,
            locations: group_options(locations, options),
        }))
    }

    /// Selected words in stop order.
    pub fn words(&self) -> Vec<&str> {
        words_for(&self.locations)
    }

    /// Renders the final mad-lib with the current selections.
    pub fn render(&self, style: RenderStyle) -> RenderedMadlib {
        render_with(self.story.final_madlib_template(), &self.words(), style)
    }

    /// Number of stops with a selected option.
    pub fn selected_count(&self) -> usize {
        self.locations.iter().filter(|l| l.selected().is_some()).count()
    }
}
