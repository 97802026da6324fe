//! Embedded schema bootstrap for the record store.
//!
//! The table is normally created by the ingestion process; running these
//! migrations at startup only creates it when absent.

use diesel::{Connection, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while bootstrapping the schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database file could not be opened.
    #[error("failed to open database {path}: {message}")]
    Connect { path: String, message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations to {path}: {message}")]
    Apply { path: String, message: String },
    /// The blocking task running the migrations did not complete.
    #[error("migration task failed: {message}")]
    Task { message: String },
}

/// Apply pending migrations synchronously.
///
/// # Errors
///
/// Returns [`MigrationError::Connect`] when the file cannot be opened and
/// [`MigrationError::Apply`] when a migration fails.
pub fn run_migrations(database_path: &str) -> Result<usize, MigrationError> {
    let mut conn =
        SqliteConnection::establish(database_path).map_err(|err| MigrationError::Connect {
            path: database_path.to_owned(),
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            path: database_path.to_owned(),
            message: err.to_string(),
        })?;
    info!(path = database_path, applied = applied.len(), "schema ready");
    Ok(applied.len())
}

/// Apply pending migrations on the blocking thread pool.
///
/// # Errors
///
/// As [`run_migrations`], plus [`MigrationError::Task`] if the blocking task
/// panics or is cancelled.
pub async fn run_migrations_async(database_path: String) -> Result<usize, MigrationError> {
    tokio::task::spawn_blocking(move || run_migrations(&database_path))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })?
}
