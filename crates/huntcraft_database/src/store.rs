//! PostgreSQL implementation of the hunt and story repositories.
//!
//! Diesel is synchronous, so every operation checks a connection out of
//! the pool inside `spawn_blocking`. Story replacement and option
//! selection each run in a single transaction.

use crate::connection::{DatabaseConfig, PgPool, create_pool, run_migrations};
use crate::models::{
    HuntChanges, HuntRow, HuntStoryRow, LocationStopChanges, LocationStopRow, NewHuntRow,
    NewHuntStoryRow,
    NewLocationStopRow, NewStoryOptionRow, StoryOptionRow,
};
use crate::schema::{hunt_stories, hunts, location_stops, location_story_options};
use crate::DatabaseResult;
use async_trait::async_trait;
use diesel::dsl::{exists, max};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use huntcraft_core::{
    Hunt, HuntId, HuntStory, HuntUpdate, LocationId, LocationStop, LocationUpdate,
    NewLocationStop, StoryOption, next_order_index,
};
use huntcraft_error::{
    BackendError, DatabaseError, DatabaseErrorKind, HuntcraftError, HuntcraftResult, StoryError,
    StoryErrorKind,
};
use huntcraft_interface::{HuntRepository, ReplacementReceipt, StoryReplacement, StoryRepository};
use std::collections::HashMap;
use std::fmt::Display;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Hunt and story store backed by PostgreSQL.
#[derive(Clone)]
pub struct PgHuntStore {
    pool: PgPool,
}

impl std::fmt::Debug for PgHuntStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgHuntStore")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl PgHuntStore {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool from the config and wraps it.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the URL is missing or the pool
    /// cannot be created.
    pub fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        Ok(Self::new(create_pool(config)?))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending schema migrations.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> HuntcraftResult<usize> {
        self.with_conn(|conn| Ok(run_migrations(conn)?)).await
    }

    async fn with_conn<T, F>(&self, op: F) -> HuntcraftResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> HuntcraftResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> HuntcraftResult<T> {
            let mut conn = pool.get().map_err(|e| {
                tracing::error!(error = %e, "Failed to check out a database connection");
                DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
            })?;
            op(&mut *conn)
        })
        .await
        .map_err(|e| BackendError::new(format!("Database task failed: {}", e)))?
    }
}

fn hunt_not_found(id: impl Display) -> StoryError {
    StoryError::new(StoryErrorKind::HuntNotFound(id.to_string()))
}

fn location_not_found(id: impl Display) -> StoryError {
    StoryError::new(StoryErrorKind::LocationNotFound(id.to_string()))
}

fn replacement_failure(
    step: &str,
    location_id: Option<LocationId>,
    option_number: Option<i32>,
    message: impl Display,
) -> StoryError {
    StoryError::new(StoryErrorKind::PartialPersistenceFailure {
        step: step.to_string(),
        location_id: location_id.map(|id| id.to_string()),
        option_number,
        message: message.to_string(),
        rolled_back: true,
    })
}

fn hunt_exists(conn: &mut PgConnection, id: Uuid) -> QueryResult<bool> {
    diesel::select(exists(hunts::table.find(id))).get_result(conn)
}

fn location_exists(conn: &mut PgConnection, id: Uuid) -> QueryResult<bool> {
    diesel::select(exists(location_stops::table.find(id))).get_result(conn)
}

fn load_location(conn: &mut PgConnection, id: LocationId) -> HuntcraftResult<LocationStop> {
    let row = location_stops::table
        .find(Uuid::from(id))
        .select(LocationStopRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| location_not_found(id))?;
    Ok(LocationStop::try_from(row)?)
}

#[async_trait]
impl HuntRepository for PgHuntStore {
    #[instrument(skip(self, hunt), fields(hunt_id = %hunt.id()))]
    async fn create_hunt(&self, hunt: Hunt) -> HuntcraftResult<Hunt> {
        self.with_conn(move |conn| {
            let row = diesel::insert_into(hunts::table)
                .values(&NewHuntRow::from(&hunt))
                .returning(HuntRow::as_returning())
                .get_result(conn)?;
            Ok(Hunt::try_from(row)?)
        })
        .await
    }

    async fn get_hunt(&self, id: HuntId) -> HuntcraftResult<Hunt> {
        self.with_conn(move |conn| {
            let row = hunts::table
                .find(Uuid::from(id))
                .select(HuntRow::as_select())
                .first(conn)
                .optional()?
                .ok_or_else(|| hunt_not_found(id))?;
            Ok(Hunt::try_from(row)?)
        })
        .await
    }

    #[instrument(skip(self, update))]
    async fn update_hunt(&self, id: HuntId, update: &HuntUpdate) -> HuntcraftResult<Hunt> {
        let changes = HuntChanges::from(update);
        self.with_conn(move |conn| {
            if changes.is_empty() {
                let row = hunts::table
                    .find(Uuid::from(id))
                    .select(HuntRow::as_select())
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| hunt_not_found(id))?;
                return Ok(Hunt::try_from(row)?);
            }
            let row = diesel::update(hunts::table.find(Uuid::from(id)))
                .set((&changes, hunts::updated_at.eq(diesel::dsl::now)))
                .returning(HuntRow::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or_else(|| hunt_not_found(id))?;
            Ok(Hunt::try_from(row)?)
        })
        .await
    }

    async fn list_locations(&self, hunt_id: HuntId) -> HuntcraftResult<Vec<LocationStop>> {
        self.with_conn(move |conn| {
            let hunt_uuid = Uuid::from(hunt_id);
            if !hunt_exists(conn, hunt_uuid)? {
                return Err(hunt_not_found(hunt_id).into());
            }
            let rows = location_stops::table
                .filter(location_stops::hunt_id.eq(hunt_uuid))
                .order(location_stops::order_index.asc())
                .select(LocationStopRow::as_select())
                .load(conn)?;
            let stops = rows
                .into_iter()
                .map(LocationStop::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(stops)
        })
        .await
    }

    async fn get_location(&self, id: LocationId) -> HuntcraftResult<LocationStop> {
        self.with_conn(move |conn| load_location(conn, id)).await
    }

    #[instrument(skip(self, stop), fields(name = %stop.name()))]
    async fn add_location(
        &self,
        hunt_id: HuntId,
        stop: NewLocationStop,
    ) -> HuntcraftResult<LocationStop> {
        self.with_conn(move |conn| {
            conn.transaction::<_, HuntcraftError, _>(|conn| {
                let hunt_uuid = Uuid::from(hunt_id);
                if !hunt_exists(conn, hunt_uuid)? {
                    return Err(hunt_not_found(hunt_id).into());
                }

                let highest: Option<i32> = location_stops::table
                    .filter(location_stops::hunt_id.eq(hunt_uuid))
                    .select(max(location_stops::order_index))
                    .first(conn)?;
                let order_index = next_order_index(highest);

                let row = diesel::insert_into(location_stops::table)
                    .values(&NewLocationStopRow::new(hunt_uuid, stop, order_index))
                    .returning(LocationStopRow::as_returning())
                    .get_result(conn)?;

                debug!(location_id = %row.id, order_index, "Location added");
                Ok(LocationStop::try_from(row)?)
            })
        })
        .await
    }

    async fn update_location(
        &self,
        id: LocationId,
        update: &LocationUpdate,
    ) -> HuntcraftResult<LocationStop> {
        let changes = LocationStopChanges::from(update);
        self.with_conn(move |conn| {
            if changes.is_empty() {
                return load_location(conn, id);
            }
            let row = diesel::update(location_stops::table.find(Uuid::from(id)))
                .set(&changes)
                .returning(LocationStopRow::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or_else(|| location_not_found(id))?;
            Ok(LocationStop::try_from(row)?)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_location(&self, id: LocationId) -> HuntcraftResult<()> {
        self.with_conn(move |conn| {
            conn.transaction::<_, HuntcraftError, _>(|conn| {
                let stop_uuid = Uuid::from(id);
                diesel::delete(
                    location_story_options::table
                        .filter(location_story_options::location_stop_id.eq(stop_uuid)),
                )
                .execute(conn)?;
                let deleted = diesel::delete(location_stops::table.find(stop_uuid)).execute(conn)?;
                if deleted == 0 {
                    return Err(location_not_found(id).into());
                }
                Ok(())
            })
        })
        .await
    }
}

/// Writes one replacement inside an open transaction.
fn write_replacement(
    conn: &mut PgConnection,
    replacement: &StoryReplacement,
) -> HuntcraftResult<ReplacementReceipt> {
    let hunt_id = *replacement.story().hunt_id();
    let hunt_uuid = Uuid::from(hunt_id);
    let stop_uuids: Vec<Uuid> = replacement
        .location_ids()
        .iter()
        .map(|id| Uuid::from(*id))
        .collect();

    if !hunt_exists(conn, hunt_uuid)? {
        return Err(hunt_not_found(hunt_id).into());
    }
    let known: Vec<Uuid> = location_stops::table
        .filter(location_stops::id.eq_any(stop_uuids.clone()))
        .filter(location_stops::hunt_id.eq(hunt_uuid))
        .select(location_stops::id)
        .load(conn)?;
    if let Some(unknown) = replacement
        .location_ids()
        .iter()
        .find(|id| !known.contains(id.as_uuid()))
    {
        return Err(location_not_found(unknown).into());
    }

    // Upsert keeps the existing story id
    let story_row = diesel::insert_into(hunt_stories::table)
        .values(&NewHuntStoryRow::from(replacement.story()))
        .on_conflict(hunt_stories::hunt_id)
        .do_update()
        .set((
            hunt_stories::intro_scene_1.eq(excluded(hunt_stories::intro_scene_1)),
            hunt_stories::intro_scene_2.eq(excluded(hunt_stories::intro_scene_2)),
            hunt_stories::intro_scene_3.eq(excluded(hunt_stories::intro_scene_3)),
            hunt_stories::final_madlib_template.eq(excluded(hunt_stories::final_madlib_template)),
            hunt_stories::theme.eq(excluded(hunt_stories::theme)),
            hunt_stories::tone.eq(excluded(hunt_stories::tone)),
            hunt_stories::updated_at.eq(diesel::dsl::now),
        ))
        .returning(HuntStoryRow::as_returning())
        .get_result(conn)?;
    let story = HuntStory::try_from(story_row)?;

    let selected: Vec<Uuid> = location_story_options::table
        .filter(location_story_options::location_stop_id.eq_any(stop_uuids.clone()))
        .filter(location_story_options::is_selected.eq(true))
        .select(location_story_options::location_stop_id)
        .load(conn)?;
    let discarded: Vec<LocationId> = replacement
        .location_ids()
        .iter()
        .filter(|id| selected.contains(id.as_uuid()))
        .copied()
        .collect();

    diesel::delete(
        location_story_options::table
            .filter(location_story_options::location_stop_id.eq_any(stop_uuids)),
    )
    .execute(conn)
    .map_err(|e| replacement_failure("delete_options", None, None, e))?;

    let mut options = Vec::with_capacity(replacement.options().len());
    for option in replacement.options() {
        let location_id = *option.location_stop_id();
        let option_number = *option.option_number();
        if !replacement.location_ids().contains(&location_id) {
            return Err(replacement_failure(
                "insert_option",
                Some(location_id),
                Some(option_number),
                "option targets a stop outside the replacement",
            )
            .into());
        }

        let row = diesel::insert_into(location_story_options::table)
            .values(&NewStoryOptionRow::from(option))
            .returning(StoryOptionRow::as_returning())
            .get_result(conn)
            .map_err(|e| {
                replacement_failure("insert_option", Some(location_id), Some(option_number), e)
            })?;
        options.push(StoryOption::try_from(row)?);
    }

    Ok(ReplacementReceipt::new(story, options, discarded))
}

#[async_trait]
impl StoryRepository for PgHuntStore {
    async fn get_story(&self, hunt_id: HuntId) -> HuntcraftResult<Option<HuntStory>> {
        self.with_conn(move |conn| {
            let row = hunt_stories::table
                .filter(hunt_stories::hunt_id.eq(Uuid::from(hunt_id)))
                .select(HuntStoryRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(HuntStory::try_from).transpose()?)
        })
        .await
    }

    async fn list_options(
        &self,
        location_ids: &[LocationId],
    ) -> HuntcraftResult<Vec<StoryOption>> {
        if location_ids.is_empty() {
            return Ok(Vec::new());
        }
        let positions: HashMap<Uuid, usize> = location_ids
            .iter()
            .enumerate()
            .map(|(position, id)| (Uuid::from(*id), position))
            .collect();

        self.with_conn(move |conn| {
            let mut rows = location_story_options::table
                .filter(
                    location_story_options::location_stop_id
                        .eq_any(positions.keys().copied().collect::<Vec<_>>()),
                )
                .select(StoryOptionRow::as_select())
                .load(conn)?;
            rows.sort_by_key(|row| {
                let position = positions
                    .get(&row.location_stop_id)
                    .copied()
                    .unwrap_or(usize::MAX);
                (position, row.option_number)
            });
            let options = rows
                .into_iter()
                .map(StoryOption::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(options)
        })
        .await
    }

    #[instrument(skip(self, replacement), fields(hunt_id = %replacement.story().hunt_id()))]
    async fn replace_story(
        &self,
        replacement: StoryReplacement,
    ) -> HuntcraftResult<ReplacementReceipt> {
        let receipt = self
            .with_conn(move |conn| {
                conn.transaction::<_, HuntcraftError, _>(|conn| {
                    write_replacement(conn, &replacement)
                })
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Story replacement rolled back"))?;

        info!(
            story_id = %receipt.story().id(),
            options = receipt.options().len(),
            discarded = receipt.discarded_selections().len(),
            "Story replaced"
        );
        Ok(receipt)
    }

    #[instrument(skip(self))]
    async fn select_option(
        &self,
        location_id: LocationId,
        option_number: i32,
    ) -> HuntcraftResult<StoryOption> {
        self.with_conn(move |conn| {
            conn.transaction::<_, HuntcraftError, _>(|conn| {
                let stop_uuid = Uuid::from(location_id);
                let target = location_story_options::table
                    .filter(location_story_options::location_stop_id.eq(stop_uuid))
                    .filter(location_story_options::option_number.eq(option_number))
                    .select(StoryOptionRow::as_select())
                    .first(conn)
                    .optional()?;
                let Some(target) = target else {
                    return Err(StoryError::new(StoryErrorKind::UnknownOption {
                        location_id: location_id.to_string(),
                        option_number,
                    })
                    .into());
                };

                // Clear first: the one-selected index is checked row by row
                diesel::update(
                    location_story_options::table
                        .filter(location_story_options::location_stop_id.eq(stop_uuid))
                        .filter(location_story_options::is_selected.eq(true))
                        .filter(location_story_options::id.ne(target.id)),
                )
                .set(location_story_options::is_selected.eq(false))
                .execute(conn)?;
                diesel::update(location_story_options::table.find(target.id))
                    .set(location_story_options::is_selected.eq(true))
                    .execute(conn)?;

                Ok(StoryOption::try_from(target)?.with_selected(true))
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn clear_selection(&self, location_id: LocationId) -> HuntcraftResult<()> {
        self.with_conn(move |conn| {
            let stop_uuid = Uuid::from(location_id);
            if !location_exists(conn, stop_uuid)? {
                return Err(location_not_found(location_id).into());
            }
            diesel::update(
                location_story_options::table
                    .filter(location_story_options::location_stop_id.eq(stop_uuid)),
            )
            .set(location_story_options::is_selected.eq(false))
            .execute(conn)?;
            Ok(())
        })
        .await
    }
}
