//! Database connection utilities.

use crate::DatabaseResult;
use derive_getters::Getters;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use huntcraft_error::{DatabaseError, DatabaseErrorKind};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Pool of PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Default environment variable holding the connection string.
pub const DEFAULT_DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Where to find the database and how many connections to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Environment variable holding the connection string
    url_env: String,
    /// Maximum pooled connections
    pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url_env: DEFAULT_DATABASE_URL_ENV.to_string(),
            pool_size: 10,
        }
    }
}

impl DatabaseConfig {
    /// Creates a config reading the URL from `url_env`.
    pub fn new(url_env: impl Into<String>, pool_size: u32) -> Self {
        Self {
            url_env: url_env.into(),
            pool_size,
        }
    }

    /// Reads the connection string from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns a connection error naming the variable when it is unset.
    pub fn database_url(&self) -> DatabaseResult<String> {
        std::env::var(&self.url_env).map_err(|_| {
            tracing::error!(var = %self.url_env, "Database URL environment variable not set");
            DatabaseError::new(DatabaseErrorKind::Connection(format!(
                "{} environment variable not set",
                self.url_env
            )))
        })
    }
}

/// Establish a connection to the PostgreSQL database.
///
/// # Errors
///
/// Returns an error if:
/// - The configured URL environment variable is not set
/// - Connection to the database fails
#[instrument(name = "database.establish_connection", skip(config), fields(url_env = %config.url_env()))]
pub fn establish_connection(config: &DatabaseConfig) -> DatabaseResult<PgConnection> {
    let database_url = config.database_url()?;

    tracing::debug!("Connecting to PostgreSQL database");
    PgConnection::establish(&database_url).map_err(|e| {
        tracing::error!(error = %e, "Failed to establish database connection");
        DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
    })
}

/// Create a connection pool for PostgreSQL database.
///
/// # Errors
///
/// Returns an error if:
/// - The configured URL environment variable is not set
/// - Pool creation fails
#[instrument(name = "database.create_pool", skip(config), fields(pool_size = config.pool_size()))]
pub fn create_pool(config: &DatabaseConfig) -> DatabaseResult<PgPool> {
    let database_url = config.database_url()?;

    tracing::debug!("Creating PostgreSQL connection pool");
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder()
        .max_size(*config.pool_size())
        .build(manager)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create connection pool");
            DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
        })
}

/// Apply any pending migrations.
///
/// Returns the number of migrations applied.
///
/// # Errors
///
/// Returns a migration error if any migration fails.
#[instrument(name = "database.run_migrations", skip(conn))]
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<usize> {
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        tracing::error!(error = %e, "Failed to run migrations");
        DatabaseError::new(DatabaseErrorKind::Migration(e.to_string()))
    })?;

    tracing::info!(count = applied.len(), "Applied migrations");
    Ok(applied.len())
}
