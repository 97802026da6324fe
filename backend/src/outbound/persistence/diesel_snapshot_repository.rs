//! SQLite-backed `SnapshotRepository` implementation using Diesel ORM.
//!
//! This adapter only reads. Rows are decoded into validated domain snapshots;
//! any malformed value fails the whole read.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde_json::Value;

use crate::domain::ports::{SnapshotRepository, SnapshotRepositoryError};
use crate::domain::{Snapshot, SnapshotDraft, SnapshotQuery, SortKey, SortOrder, ViewsEntry};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{SnapshotRow, ViewsRow};
use super::pool::{DbPool, PoolError};
use super::schema::wiki_history;

/// Escape character used in `LIKE` patterns.
const LIKE_ESCAPE: char = '\\';

/// Diesel-backed implementation of the snapshot repository port.
#[derive(Clone)]
pub struct DieselSnapshotRepository {
    pool: DbPool,
}

impl DieselSnapshotRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SnapshotRepositoryError {
    map_basic_pool_error(error, SnapshotRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SnapshotRepositoryError {
    map_basic_diesel_error(
        error,
        SnapshotRepositoryError::query,
        |message| SnapshotRepositoryError::decode("row", message),
        SnapshotRepositoryError::connection,
    )
}

/// Build a `%…%` pattern matching `needle` literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, SnapshotRepositoryError> {
    value.ok_or_else(|| SnapshotRepositoryError::decode(field, "unexpected NULL"))
}

/// Convert a database row into a validated domain snapshot.
fn row_to_snapshot(row: SnapshotRow) -> Result<Snapshot, SnapshotRepositoryError> {
    let SnapshotRow {
        id,
        title,
        char_count,
        content,
        last_edit,
        editor,
        links,
        timestamp,
        diff,
        total_views,
        average_daily_views,
    } = row;

    let links: Vec<String> = serde_json::from_str(&required("links", links)?)
        .map_err(|err| SnapshotRepositoryError::decode("links", err.to_string()))?;
    let diff: Value = serde_json::from_str(&required("diff", diff)?)
        .map_err(|err| SnapshotRepositoryError::decode("diff", err.to_string()))?;

    Snapshot::new(SnapshotDraft {
        id,
        title: title.unwrap_or_default(),
        char_count: required("char_count", char_count)?,
        content: content.unwrap_or_default(),
        last_edit: last_edit.unwrap_or_default(),
        editor: editor.unwrap_or_default(),
        links,
        timestamp: required("timestamp", timestamp)?,
        diff,
        total_views: required("total_views", total_views)?,
        average_daily_views: required("average_daily_views", average_daily_views)?,
    })
    .map_err(|err| SnapshotRepositoryError::decode(err.field(), err.to_string()))
}

fn row_to_views_entry(row: ViewsRow) -> Result<ViewsEntry, SnapshotRepositoryError> {
    Ok(ViewsEntry {
        id: row.id,
        title: row.title.unwrap_or_default(),
        views: required("total_views", row.total_views)?,
    })
}

#[async_trait]
impl SnapshotRepository for DieselSnapshotRepository {
    async fn list(&self, query: &SnapshotQuery) -> Result<Vec<Snapshot>, SnapshotRepositoryError> {
        use wiki_history::dsl;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut statement = wiki_history::table
            .select(SnapshotRow::as_select())
            .into_boxed();
        if let Some(title) = query.title.as_deref() {
            statement = statement.filter(
                dsl::title
                    .like(contains_pattern(title))
                    .escape(LIKE_ESCAPE),
            );
        }
        statement = match (query.sort_by, query.order) {
            (SortKey::Id, SortOrder::Asc) => statement.order_by(dsl::id.asc()),
            (SortKey::Id, SortOrder::Desc) => statement.order_by(dsl::id.desc()),
            (SortKey::Timestamp, SortOrder::Asc) => statement.order_by(dsl::timestamp.asc()),
            (SortKey::Timestamp, SortOrder::Desc) => statement.order_by(dsl::timestamp.desc()),
            (SortKey::TotalViews, SortOrder::Asc) => statement.order_by(dsl::total_views.asc()),
            (SortKey::TotalViews, SortOrder::Desc) => statement.order_by(dsl::total_views.desc()),
            (SortKey::AverageDailyViews, SortOrder::Asc) => {
                statement.order_by(dsl::average_daily_views.asc())
            }
            (SortKey::AverageDailyViews, SortOrder::Desc) => {
                statement.order_by(dsl::average_daily_views.desc())
            }
        };

        let rows: Vec<SnapshotRow> = statement
            .then_order_by(dsl::id.asc())
            .offset(query.page.sql_offset())
            .limit(query.page.sql_limit())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_snapshot).collect()
    }

    async fn load_all(&self) -> Result<Vec<Snapshot>, SnapshotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SnapshotRow> = wiki_history::table
            .select(SnapshotRow::as_select())
            .order_by(wiki_history::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_snapshot).collect()
    }

    async fn min_views_entry(&self) -> Result<Option<ViewsEntry>, SnapshotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ViewsRow> = wiki_history::table
            .select(ViewsRow::as_select())
            .order_by((wiki_history::total_views.asc(), wiki_history::id.asc()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_views_entry).transpose()
    }

    async fn max_views_entry(&self) -> Result<Option<ViewsEntry>, SnapshotRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ViewsRow> = wiki_history::table
            .select(ViewsRow::as_select())
            .order_by((wiki_history::total_views.desc(), wiki_history::id.asc()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_views_entry).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Row decoding and pattern escaping; SQL paths are covered by the
    //! integration suite against temporary SQLite files.

    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn row() -> SnapshotRow {
        SnapshotRow {
            id: 1,
            title: Some("Rust".to_owned()),
            char_count: Some(1_000),
            content: None,
            last_edit: Some("2024-01-01".to_owned()),
            editor: None,
            links: Some(r#"["Cargo", "LLVM"]"#.to_owned()),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(8, 0, 0)),
            diff: Some(r#"{"added": 12}"#.to_owned()),
            total_views: Some(100),
            average_daily_views: Some(3_000),
        }
    }

    #[rstest]
    #[case("plain", "%plain%")]
    #[case("50%", r"%50\%%")]
    #[case("snake_case", r"%snake\_case%")]
    #[case(r"back\slash", r"%back\\slash%")]
    fn contains_pattern_escapes_wildcards(#[case] needle: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(needle), expected);
    }

    #[rstest]
    fn decodes_json_columns_and_blank_text(row: SnapshotRow) {
        let snapshot = row_to_snapshot(row).expect("valid row");
        assert_eq!(snapshot.links(), ["Cargo", "LLVM"]);
        assert_eq!(snapshot.diff(), &serde_json::json!({ "added": 12 }));
        assert_eq!(snapshot.content(), "");
        assert_eq!(snapshot.editor(), "");
    }

    #[rstest]
    fn malformed_links_are_decode_errors(mut row: SnapshotRow) {
        row.links = Some("[not json".to_owned());
        let err = row_to_snapshot(row).expect_err("bad links");
        assert!(matches!(
            err,
            SnapshotRepositoryError::Decode { ref field, .. } if field == "links"
        ));
    }

    #[rstest]
    #[case::timestamp("timestamp")]
    #[case::views("total_views")]
    #[case::diff("diff")]
    fn null_required_columns_are_decode_errors(mut row: SnapshotRow, #[case] field: &str) {
        match field {
            "timestamp" => row.timestamp = None,
            "total_views" => row.total_views = None,
            _ => row.diff = None,
        }
        let err = row_to_snapshot(row).expect_err("null column");
        assert_eq!(err, SnapshotRepositoryError::decode(field, "unexpected NULL"));
    }

    #[rstest]
    fn negative_counters_are_decode_errors(mut row: SnapshotRow) {
        row.char_count = Some(-5);
        let err = row_to_snapshot(row).expect_err("negative counter");
        assert!(matches!(
            err,
            SnapshotRepositoryError::Decode { ref field, .. } if field == "char_count"
        ));
    }
}
