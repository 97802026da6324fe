//! Snapshot record read-model and its projections.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Validation errors raised by [`Snapshot::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotValidationError {
    /// A counter column held a negative value.
    #[error("{field} must not be negative, got {value}")]
    NegativeCount {
        /// Column name.
        field: &'static str,
        /// Offending value.
        value: i64,
    },
}

impl SnapshotValidationError {
    /// Column that failed validation.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::NegativeCount { field, .. } => field,
        }
    }
}

/// Input payload for [`Snapshot::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDraft {
    pub id: i64,
    pub title: String,
    pub char_count: i64,
    pub content: String,
    pub last_edit: String,
    pub editor: String,
    pub links: Vec<String>,
    pub timestamp: NaiveDateTime,
    pub diff: Value,
    pub total_views: i64,
    pub average_daily_views: i64,
}

/// One stored observation of the article's metadata.
///
/// ## Invariants
/// - `char_count`, `total_views` and `average_daily_views` are non-negative.
///
/// Serialises with snake_case keys; `links` and `diff` appear as decoded JSON
/// rather than the text the store keeps.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Snapshot {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Rust (programming language)")]
    title: String,
    #[schema(example = 84_213)]
    char_count: i64,
    content: String,
    #[schema(example = "2024-01-02T09:15:00Z")]
    last_edit: String,
    #[schema(example = "ExampleEditor")]
    editor: String,
    links: Vec<String>,
    #[schema(value_type = String, example = "2024-01-02T09:30:00")]
    timestamp: NaiveDateTime,
    #[schema(value_type = Object)]
    diff: Value,
    #[schema(example = 3_812)]
    total_views: i64,
    #[schema(example = 3_120)]
    average_daily_views: i64,
}

impl Snapshot {
    /// Validate and construct a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotValidationError::NegativeCount`] when a counter is
    /// negative.
    pub fn new(draft: SnapshotDraft) -> Result<Self, SnapshotValidationError> {
        Self::try_from(draft)
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }
    #[must_use]
    pub fn char_count(&self) -> i64 {
        self.char_count
    }
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
    #[must_use]
    pub fn last_edit(&self) -> &str {
        self.last_edit.as_str()
    }
    #[must_use]
    pub fn editor(&self) -> &str {
        self.editor.as_str()
    }
    #[must_use]
    pub fn links(&self) -> &[String] {
        &self.links
    }
    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
    #[must_use]
    pub fn diff(&self) -> &Value {
        &self.diff
    }
    #[must_use]
    pub fn total_views(&self) -> i64 {
        self.total_views
    }
    #[must_use]
    pub fn average_daily_views(&self) -> i64 {
        self.average_daily_views
    }
}

impl TryFrom<SnapshotDraft> for Snapshot {
    type Error = SnapshotValidationError;

    fn try_from(draft: SnapshotDraft) -> Result<Self, Self::Error> {
        ensure_non_negative("char_count", draft.char_count)?;
        ensure_non_negative("total_views", draft.total_views)?;
        ensure_non_negative("average_daily_views", draft.average_daily_views)?;
        Ok(Self {
            id: draft.id,
            title: draft.title,
            char_count: draft.char_count,
            content: draft.content,
            last_edit: draft.last_edit,
            editor: draft.editor,
            links: draft.links,
            timestamp: draft.timestamp,
            diff: draft.diff,
            total_views: draft.total_views,
            average_daily_views: draft.average_daily_views,
        })
    }
}

fn ensure_non_negative(field: &'static str, value: i64) -> Result<(), SnapshotValidationError> {
    if value < 0 {
        return Err(SnapshotValidationError::NegativeCount { field, value });
    }
    Ok(())
}

/// `{ id, title, views }` projection of the record with extreme view counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViewsEntry {
    #[schema(example = 2)]
    pub id: i64,
    #[schema(example = "Rust (programming language)")]
    pub title: String,
    #[schema(example = 150)]
    pub views: i64,
}

impl From<&Snapshot> for ViewsEntry {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            id: snapshot.id,
            title: snapshot.title.clone(),
            views: snapshot.total_views,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn draft() -> SnapshotDraft {
        SnapshotDraft {
            id: 7,
            title: "Rust".to_owned(),
            char_count: 1_000,
            content: "body".to_owned(),
            last_edit: "2024-01-01".to_owned(),
            editor: "alice".to_owned(),
            links: vec!["Cargo".to_owned(), "LLVM".to_owned()],
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .expect("valid timestamp"),
            diff: json!({ "added": ["Cargo"], "removed": [] }),
            total_views: 100,
            average_daily_views: 3_000,
        }
    }

    #[rstest]
    fn accepts_valid_draft(draft: SnapshotDraft) {
        let snapshot = Snapshot::new(draft).expect("valid snapshot");
        assert_eq!(snapshot.id(), 7);
        assert_eq!(snapshot.links(), ["Cargo", "LLVM"]);
    }

    #[rstest]
    #[case("char_count")]
    #[case("total_views")]
    #[case("average_daily_views")]
    fn rejects_negative_counters(mut draft: SnapshotDraft, #[case] field: &str) {
        match field {
            "char_count" => draft.char_count = -1,
            "total_views" => draft.total_views = -1,
            _ => draft.average_daily_views = -1,
        }
        let err = Snapshot::new(draft).expect_err("negative counter");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn serialises_with_decoded_json_columns(draft: SnapshotDraft) {
        let snapshot = Snapshot::new(draft).expect("valid snapshot");
        let value = serde_json::to_value(&snapshot).expect("serialise");
        assert_eq!(value["links"], json!(["Cargo", "LLVM"]));
        assert_eq!(value["diff"]["added"], json!(["Cargo"]));
        assert_eq!(value["timestamp"], json!("2024-01-01T12:00:00"));
        assert_eq!(value["average_daily_views"], json!(3_000));
    }

    #[rstest]
    fn views_entry_projects_total_views(draft: SnapshotDraft) {
        let snapshot = Snapshot::new(draft).expect("valid snapshot");
        assert_eq!(
            ViewsEntry::from(&snapshot),
            ViewsEntry {
                id: 7,
                title: "Rust".to_owned(),
                views: 100
            }
        );
    }
}
