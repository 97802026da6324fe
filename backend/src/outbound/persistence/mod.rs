//! SQLite persistence adapter using Diesel ORM.
//!
//! The record store is a single `wiki_history` table. Access goes through
//! `diesel-async` over a `bb8` pool of wrapped synchronous SQLite
//! connections.
//!
//! - **Thin adapter**: the repository only translates rows into domain
//!   snapshots. No analysis happens here.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool, query and decode failures map onto
//!   `SnapshotRepositoryError`.
//!
//! # Example
//!
//! ```no_run
//! use wiki_history::outbound::persistence::{DbPool, DieselSnapshotRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::default()).await?;
//! let repository = DieselSnapshotRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_snapshot_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_snapshot_repository::DieselSnapshotRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations, run_migrations_async};
pub use pool::{DEFAULT_DATABASE_PATH, DbPool, PoolConfig, PoolError, SqliteAsyncConnection};
