//! Host selection of one option per location.

use huntcraft_core::{HuntId, LocationId, LocationStop, MAX_OPTIONS_PER_LOCATION, StoryOption};
use huntcraft_error::{HuntcraftResult, StoryError, StoryErrorKind};
use huntcraft_interface::{HuntRepository, StoryRepository};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A stop together with its generated options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct LocationOptions {
    location: LocationStop,
    /// Sorted by option number
    options: Vec<StoryOption>,
}

impl LocationOptions {
    /// Pairs a stop with its options.
    pub fn new(location: LocationStop, mut options: Vec<StoryOption>) -> Self {
        options.sort_by_key(|o| *o.option_number());
        Self { location, options }
    }

    /// The currently selected option, if any.
    pub fn selected(&self) -> Option<&StoryOption> {
        self.options.iter().find(|o| o.is_selected())
    }
}

/// Groups options under their stops, keeping the stops' order.
pub fn group_options(
    locations: Vec<LocationStop>,
    options: Vec<StoryOption>,
) -> Vec<LocationOptions> {
    let mut by_location: HashMap<LocationId, Vec<StoryOption>> = HashMap::new();
    for option in options {
        by_location
            .entry(*option.location_stop_id())
            .or_default()
            .push(option);
    }

    locations
        .into_iter()
        .map(|location| {
            let options = by_location.remove(location.id()).unwrap_or_default();
            LocationOptions::new(location, options)
        })
        .collect()
}

/// Switches which option is selected at a stop.
///
/// The clear-then-set happens inside the store as one transactional
/// unit, so readers never observe zero or two selected options mid-switch.
pub struct OptionSelector<H: ?Sized, S: ?Sized> {
    hunts: Arc<H>,
    stories: Arc<S>,
}

impl<H: ?Sized, S: ?Sized> Clone for OptionSelector<H, S> {
    fn clone(&self) -> Self {
        Self {
            hunts: Arc::clone(&self.hunts),
            stories: Arc::clone(&self.stories),
        }
    }
}

impl<H, S> OptionSelector<H, S>
where
    H: HuntRepository + ?Sized,
    S: StoryRepository + ?Sized,
{
    /// Creates a selector over the given stores.
    pub fn new(hunts: Arc<H>, stories: Arc<S>) -> Self {
        Self { hunts, stories }
    }

    /// Makes `option_number` the only selected option at `location_id`.
    ///
    /// Idempotent. Fails with `UnknownOption`, changing nothing, when the
    /// stop has no such option.
    #[instrument(skip(self), fields(location_id = %location_id, option_number))]
    pub async fn select_option(
        &self,
        location_id: LocationId,
        option_number: i32,
    ) -> HuntcraftResult<StoryOption> {
        if option_number < 1 || option_number > MAX_OPTIONS_PER_LOCATION as i32 {
            debug!("Option number outside the generated range");
            return Err(StoryError::new(StoryErrorKind::UnknownOption {
                location_id: location_id.to_string(),
                option_number,
            })
            .into());
        }

        let selected = self.stories.select_option(location_id, option_number).await?;
        info!(option_id = %selected.id(), "Option selected");
        Ok(selected)
    }

    /// Leaves the stop with no selected option.
    #[instrument(skip(self), fields(location_id = %location_id))]
    pub async fn clear_selection(&self, location_id: LocationId) -> HuntcraftResult<()> {
        self.stories.clear_selection(location_id).await?;
        info!("Selection cleared");
        Ok(())
    }

    /// Every stop of the hunt in order, each with its options.
    #[instrument(skip(self), fields(hunt_id = %hunt_id))]
    pub async fn selections(&self, hunt_id: HuntId) -> HuntcraftResult<Vec<LocationOptions>> {
        let locations = self.hunts.list_locations(hunt_id).await?;
        let ids: Vec<LocationId> = locations.iter().map(|l| *l.id()).collect();
        let options = self.stories.list_options(&ids).await?;
        debug!(
            locations = locations.len(),
            options = options.len(),
            "Loaded selections"
        );
        Ok(group_options(locations, options))
    }
}
