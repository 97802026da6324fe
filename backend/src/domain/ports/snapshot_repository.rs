//! Port for reading snapshot records from the record store.
//!
//! The store is written by an external ingestion process; adapters only read.

use std::cmp::Ordering;

use async_trait::async_trait;
use tracing::error;

use crate::domain::{Error, Snapshot, SnapshotQuery, SortKey, SortOrder, ViewsEntry};

use super::define_port_error;

define_port_error! {
    /// Errors raised by snapshot repository adapters.
    pub enum SnapshotRepositoryError {
        /// The store could not be reached or a connection checked out.
        Connection { message: String } =>
            "snapshot repository connection failed: {message}",
        /// A query failed during execution.
        Query { message: String } =>
            "snapshot repository query failed: {message}",
        /// A stored value could not be decoded into a snapshot.
        Decode { field: String, message: String } =>
            "snapshot repository could not decode {field}: {message}",
    }
}

/// Read access to the `wiki_history` record store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Filter, order and page through snapshots.
    ///
    /// Ordering ties are broken by ascending id.
    async fn list(&self, query: &SnapshotQuery) -> Result<Vec<Snapshot>, SnapshotRepositoryError>;

    /// Every snapshot in ascending id order.
    async fn load_all(&self) -> Result<Vec<Snapshot>, SnapshotRepositoryError>;

    /// Snapshot with the lowest total views, if any.
    async fn min_views_entry(&self) -> Result<Option<ViewsEntry>, SnapshotRepositoryError>;

    /// Snapshot with the highest total views, if any.
    async fn max_views_entry(&self) -> Result<Option<ViewsEntry>, SnapshotRepositoryError>;
}

/// In-memory repository backed by a fixed set of snapshots.
///
/// Mirrors the SQL adapter's filtering (ASCII case-insensitive, like SQLite's
/// `LIKE`), ordering and tie-breaking so handler and analysis tests can run
/// without a database.
#[derive(Debug, Default, Clone)]
pub struct FixtureSnapshotRepository {
    snapshots: Vec<Snapshot>,
}

impl FixtureSnapshotRepository {
    /// Build a fixture holding `snapshots`.
    #[must_use]
    pub fn new(mut snapshots: Vec<Snapshot>) -> Self {
        snapshots.sort_by_key(Snapshot::id);
        Self { snapshots }
    }

    fn extreme_by_views(&self, wanted: Ordering) -> Option<ViewsEntry> {
        self.snapshots
            .iter()
            .reduce(|best, candidate| {
                if candidate.total_views().cmp(&best.total_views()) == wanted {
                    candidate
                } else {
                    best
                }
            })
            .map(ViewsEntry::from)
    }
}

fn compare_by(key: SortKey, left: &Snapshot, right: &Snapshot) -> Ordering {
    match key {
        SortKey::Id => left.id().cmp(&right.id()),
        SortKey::Timestamp => left.timestamp().cmp(&right.timestamp()),
        SortKey::TotalViews => left.total_views().cmp(&right.total_views()),
        SortKey::AverageDailyViews => left.average_daily_views().cmp(&right.average_daily_views()),
    }
}

#[async_trait]
impl SnapshotRepository for FixtureSnapshotRepository {
    async fn list(&self, query: &SnapshotQuery) -> Result<Vec<Snapshot>, SnapshotRepositoryError> {
        let mut matching: Vec<Snapshot> = self
            .snapshots
            .iter()
            .filter(|snapshot| {
                query.title.as_deref().is_none_or(|needle| {
                    snapshot
                        .title()
                        .to_ascii_lowercase()
                        .contains(&needle.to_ascii_lowercase())
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            let primary = compare_by(query.sort_by, left, right);
            let directed = match query.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            directed.then_with(|| left.id().cmp(&right.id()))
        });
        let skip = usize::try_from(query.page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn load_all(&self) -> Result<Vec<Snapshot>, SnapshotRepositoryError> {
        Ok(self.snapshots.clone())
    }

    async fn min_views_entry(&self) -> Result<Option<ViewsEntry>, SnapshotRepositoryError> {
        Ok(self.extreme_by_views(Ordering::Less))
    }

    async fn max_views_entry(&self) -> Result<Option<ViewsEntry>, SnapshotRepositoryError> {
        Ok(self.extreme_by_views(Ordering::Greater))
    }
}

impl From<SnapshotRepositoryError> for Error {
    fn from(err: SnapshotRepositoryError) -> Self {
        match err {
            SnapshotRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("snapshot store unavailable: {message}"))
            }
            SnapshotRepositoryError::Query { message } => {
                error!(%message, "snapshot query failed");
                Error::internal(format!("snapshot query failed: {message}"))
            }
            SnapshotRepositoryError::Decode { field, message } => {
                error!(%field, %message, "stored snapshot could not be decoded");
                Error::internal(format!("could not decode {field}: {message}"))
            }
        }
    }
}
