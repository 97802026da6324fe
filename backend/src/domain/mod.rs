//! Domain primitives, the record-store port and the analysis stage.
//!
//! Purpose: define the snapshot read-model shared by the HTTP adapter and the
//! reporting pipeline. Types are immutable once validated.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error envelope.
//! - Snapshot / ViewsEntry — stored record and its min/max-views projection.
//! - SnapshotQuery / SortKey / SortOrder — validated listing query.
//! - Analyzer — load, basic statistics and daily aggregation.
//! - ports::SnapshotRepository — read port implemented by persistence adapters.

pub mod analysis;
pub mod error;
pub mod ports;
pub mod query;
pub mod snapshot;
pub mod trace_id;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::analysis::{
    Analyzer, BasicStats, DailyAggregate, DailySeries, LAST_UPDATE_FORMAT, SnapshotFrame,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::query::{SnapshotQuery, SortKey, SortOrder, UnknownSortValue};
pub use self::snapshot::{Snapshot, SnapshotDraft, SnapshotValidationError, ViewsEntry};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use wiki_history::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::invalid_request("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
