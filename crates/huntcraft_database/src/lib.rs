//! PostgreSQL storage for Huntcraft.
//!
//! [`PgHuntStore`] implements the hunt and story repositories with Diesel
//! over an r2d2 pool. Schema migrations are embedded and applied with
//! [`run_migrations`] or [`PgHuntStore::migrate`].

#![warn(missing_docs)]

mod connection;
mod models;
#[allow(missing_docs)]
pub mod schema;
mod store;

pub use connection::{
    DEFAULT_DATABASE_URL_ENV, DatabaseConfig, MIGRATIONS, PgPool, create_pool,
    establish_connection, run_migrations,
};
pub use models::{
    HuntChanges, HuntRow, HuntStoryRow, LocationStopChanges, LocationStopRow, NewHuntRow,
    NewHuntStoryRow, NewLocationStopRow, NewStoryOptionRow, StoryOptionRow,
};
pub use store::PgHuntStore;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, huntcraft_error::DatabaseError>;
