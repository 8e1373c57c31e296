//! In-memory implementation of the hunt and story repositories.
//!
//! All tables sit behind one `RwLock`, so replacing a story and switching
//! a selection are atomic with respect to readers. Useful for tests and
//! for dry runs of the CLI. All data is lost when the store is dropped.

use async_trait::async_trait;
use huntcraft_core::{
    Hunt, HuntId, HuntStory, HuntUpdate, LocationId, LocationStop, LocationUpdate,
    NewLocationStop, OptionId, StoryOption, next_order_index,
};
use huntcraft_error::{BackendError, HuntcraftResult, StoryError, StoryErrorKind};
use huntcraft_interface::{HuntRepository, ReplacementReceipt, StoryReplacement, StoryRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Default)]
struct Tables {
    hunts: HashMap<HuntId, Hunt>,
    locations: HashMap<LocationId, LocationStop>,
    stories: HashMap<HuntId, HuntStory>,
    options: HashMap<LocationId, Vec<StoryOption>>,
}

/// In-memory store for hunts, stops, stories and options.
///
/// # Example
/// ```no_run
/// use huntcraft_core::{Hunt, NewLocationStop};
/// use huntcraft_interface::HuntRepository;
/// use huntcraft_story::InMemoryHuntStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryHuntStore::new();
///     let hunt = store
///         .create_hunt(Hunt::builder().title("Pub Quest").build().unwrap())
///         .await
///         .unwrap();
///     let stop = store
///         .add_location(*hunt.id(), NewLocationStop::named("The Anchor"))
///         .await
///         .unwrap();
///     assert_eq!(*stop.order_index(), 1);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryHuntStore {
    tables: Arc<RwLock<Tables>>,
    /// Fails the n-th option insert of the next replacements (for testing)
    fail_inserts_after: Arc<RwLock<Option<usize>>>,
}

impl InMemoryHuntStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later replacement fail after inserting `count` options.
    ///
    /// The failed replacement is rolled back. Pass `None` to stop failing.
    pub async fn fail_inserts_after(&self, count: Option<usize>) {
        *self.fail_inserts_after.write().await = count;
    }

    /// Total number of stored options (for testing).
    pub async fn option_count(&self) -> usize {
        self.tables.read().await.options.values().map(Vec::len).sum()
    }

    /// Clear all tables (for testing).
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

fn hunt_not_found(id: HuntId) -> StoryError {
    StoryError::new(StoryErrorKind::HuntNotFound(id.to_string()))
}

fn location_not_found(id: LocationId) -> StoryError {
    StoryError::new(StoryErrorKind::LocationNotFound(id.to_string()))
}

#[async_trait]
impl HuntRepository for InMemoryHuntStore {
    #[instrument(skip(self, hunt), fields(hunt_id = %hunt.id()))]
    async fn create_hunt(&self, hunt: Hunt) -> HuntcraftResult<Hunt> {
        let mut tables = self.tables.write().await;
        if tables.hunts.contains_key(hunt.id()) {
            return Err(BackendError::new(format!("Hunt {} already exists", hunt.id())).into());
        }
        tables.hunts.insert(*hunt.id(), hunt.clone());
        Ok(hunt)
    }

    async fn get_hunt(&self, id: HuntId) -> HuntcraftResult<Hunt> {
        let tables = self.tables.read().await;
        tables
            .hunts
            .get(&id)
            .cloned()
            .ok_or_else(|| hunt_not_found(id).into())
    }

    #[instrument(skip(self, update))]
    async fn update_hunt(&self, id: HuntId, update: &HuntUpdate) -> HuntcraftResult<Hunt> {
        let mut tables = self.tables.write().await;
        let hunt = tables.hunts.get_mut(&id).ok_or_else(|| hunt_not_found(id))?;
        hunt.apply(update);
        Ok(hunt.clone())
    }

    async fn list_locations(&self, hunt_id: HuntId) -> HuntcraftResult<Vec<LocationStop>> {
        let tables = self.tables.read().await;
        if !tables.hunts.contains_key(&hunt_id) {
            return Err(hunt_not_found(hunt_id).into());
        }
        let mut stops: Vec<LocationStop> = tables
            .locations
            .values()
            .filter(|l| *l.hunt_id() == hunt_id)
            .cloned()
            .collect();
        stops.sort_by_key(|l| *l.order_index());
        Ok(stops)
    }

    async fn get_location(&self, id: LocationId) -> HuntcraftResult<LocationStop> {
        let tables = self.tables.read().await;
        tables
            .locations
            .get(&id)
            .cloned()
            .ok_or_else(|| location_not_found(id).into())
    }

    #[instrument(skip(self, stop), fields(name = %stop.name()))]
    async fn add_location(
        &self,
        hunt_id: HuntId,
        stop: NewLocationStop,
    ) -> HuntcraftResult<LocationStop> {
        let mut tables = self.tables.write().await;
        if !tables.hunts.contains_key(&hunt_id) {
            return Err(hunt_not_found(hunt_id).into());
        }

        let order_index = next_order_index(
            tables
                .locations
                .values()
                .filter(|l| *l.hunt_id() == hunt_id)
                .map(|l| *l.order_index()),
        );
        let location = LocationStop::builder()
            .hunt_id(hunt_id)
            .name(stop.name().clone())
            .address(stop.address().clone())
            .order_index(order_index)
            .is_final_stop(*stop.is_final_stop())
            .build()
            .map_err(|e| BackendError::new(format!("location stop: {}", e)))?;

        debug!(location_id = %location.id(), order_index, "Location added");
        tables.locations.insert(*location.id(), location.clone());
        Ok(location)
    }

    async fn update_location(
        &self,
        id: LocationId,
        update: &LocationUpdate,
    ) -> HuntcraftResult<LocationStop> {
        let mut tables = self.tables.write().await;
        let location = tables
            .locations
            .get_mut(&id)
            .ok_or_else(|| location_not_found(id))?;
        location.apply(update);
        Ok(location.clone())
    }

    #[instrument(skip(self))]
    async fn delete_location(&self, id: LocationId) -> HuntcraftResult<()> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Err(location_not_found(id).into());
        }
        tables.options.remove(&id);
        Ok(())
    }
}

impl Tables {
    /// Applies a replacement in place. On error the caller restores a snapshot.
    fn replace(
        &mut self,
        replacement: StoryReplacement,
        fail_after: Option<usize>,
    ) -> Result<ReplacementReceipt, StoryError> {
        let hunt_id = *replacement.story().hunt_id();
        if !self.hunts.contains_key(&hunt_id) {
            return Err(hunt_not_found(hunt_id));
        }
        if let Some(unknown) = replacement
            .location_ids()
            .iter()
            .find(|id| !self.locations.contains_key(*id))
        {
            return Err(location_not_found(*unknown));
        }

        let story = match self.stories.get(&hunt_id) {
            Some(existing) => existing.replaced_by(replacement.story().clone()),
            None => replacement.story().clone(),
        };
        self.stories.insert(hunt_id, story.clone());

        let mut discarded = Vec::new();
        for id in replacement.location_ids() {
            if let Some(old) = self.options.remove(id)
                && old.iter().any(StoryOption::is_selected)
            {
                discarded.push(*id);
            }
        }

        let mut inserted = Vec::new();
        for option in replacement.options() {
            let location_id = *option.location_stop_id();
            let option_number = *option.option_number();
            let failure = |message: String| {
                StoryError::new(StoryErrorKind::PartialPersistenceFailure {
                    step: "insert_option".to_string(),
                    location_id: Some(location_id.to_string()),
                    option_number: Some(option_number),
                    message,
                    rolled_back: true,
                })
            };

            if fail_after == Some(inserted.len()) {
                return Err(failure("insert rejected by test hook".to_string()));
            }
            if !replacement.location_ids().contains(&location_id) {
                return Err(failure("option targets a stop outside the replacement".to_string()));
            }

            let slot = self.options.entry(location_id).or_default();
            if slot.iter().any(|o| *o.option_number() == option_number) {
                return Err(failure("duplicate option number".to_string()));
            }
            let stored = option.clone().into_option(OptionId::new());
            slot.push(stored.clone());
            inserted.push(stored);
        }

        Ok(ReplacementReceipt::new(story, inserted, discarded))
    }
}

#[async_trait]
impl StoryRepository for InMemoryHuntStore {
    async fn get_story(&self, hunt_id: HuntId) -> HuntcraftResult<Option<HuntStory>> {
        Ok(self.tables.read().await.stories.get(&hunt_id).cloned())
    }

    async fn list_options(
        &self,
        location_ids: &[LocationId],
    ) -> HuntcraftResult<Vec<StoryOption>> {
        let tables = self.tables.read().await;
        let mut options = Vec::new();
        for id in location_ids {
            if let Some(stored) = tables.options.get(id) {
                let mut stored = stored.clone();
                stored.sort_by_key(|o| *o.option_number());
                options.extend(stored);
            }
        }
        Ok(options)
    }

    #[instrument(skip(self, replacement), fields(hunt_id = %replacement.story().hunt_id()))]
    async fn replace_story(
        &self,
        replacement: StoryReplacement,
    ) -> HuntcraftResult<ReplacementReceipt> {
        let fail_after = *self.fail_inserts_after.read().await;
        let mut tables = self.tables.write().await;
        let snapshot = tables.clone();

        match tables.replace(replacement, fail_after) {
            Ok(receipt) => {
                debug!(options = receipt.options().len(), "Story replaced");
                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, "Story replacement rolled back");
                *tables = snapshot;
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn select_option(
        &self,
        location_id: LocationId,
        option_number: i32,
    ) -> HuntcraftResult<StoryOption> {
        let mut tables = self.tables.write().await;
        let unknown = || {
            StoryError::new(StoryErrorKind::UnknownOption {
                location_id: location_id.to_string(),
                option_number,
            })
        };

        let options = tables.options.get_mut(&location_id).ok_or_else(unknown)?;
        if !options.iter().any(|o| *o.option_number() == option_number) {
            return Err(unknown().into());
        }

        let mut selected = None;
        for option in options.iter_mut() {
            let is_target = *option.option_number() == option_number;
            option.set_selected(is_target);
            if is_target {
                selected = Some(option.clone());
            }
        }
        selected.ok_or_else(|| unknown().into())
    }

    #[instrument(skip(self))]
    async fn clear_selection(&self, location_id: LocationId) -> HuntcraftResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.locations.contains_key(&location_id) {
            return Err(location_not_found(location_id).into());
        }
        if let Some(options) = tables.options.get_mut(&location_id) {
            options.iter_mut().for_each(|o| o.set_selected(false));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huntcraft_core::{FinalStopMode, PlayOrder};

    #[tokio::test]
    async fn test_update_hunt_details_and_settings() {
        let store = InMemoryHuntStore::new();
        let hunt = store
            .create_hunt(
                Hunt::builder()
                    .title("Old Town Crawl")
                    .city(Some("York".to_string()))
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();

        let update = HuntUpdate::builder()
            .title("Walls Crawl")
            .description(Some("Six pubs inside the city walls".to_string()))
            .city(None::<String>)
            .play_order(PlayOrder::Linear)
            .final_stop_mode(FinalStopMode::NoFinalStop)
            .build()
            .unwrap();
        let updated = store.update_hunt(*hunt.id(), &update).await.unwrap();

        assert_eq!(updated.title(), "Walls Crawl");
        assert_eq!(
            updated.description().as_deref(),
            Some("Six pubs inside the city walls")
        );
        assert!(updated.city().is_none());
        assert_eq!(*updated.play_order(), PlayOrder::Linear);
        assert_eq!(store.get_hunt(*hunt.id()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_hunt() {
        let store = InMemoryHuntStore::new();
        let err = store
            .update_hunt(HuntId::new(), &HuntUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_story().unwrap().kind,
            StoryErrorKind::HuntNotFound(_)
        ));
    }
}
