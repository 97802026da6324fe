//! Snapshot builders shared by domain unit tests.

use chrono::NaiveDateTime;
use serde_json::json;

use super::{Snapshot, SnapshotDraft};

/// Parse an ISO-8601 local timestamp such as `2024-01-01T08:00:00`.
pub(crate) fn at(raw: &str) -> NaiveDateTime {
    raw.parse().expect("fixture timestamps are valid")
}

/// Snapshot with the given counters.
pub(crate) fn snapshot_with(
    id: i64,
    timestamp: &str,
    char_count: i64,
    total_views: i64,
    average_daily_views: i64,
) -> Snapshot {
    Snapshot::new(SnapshotDraft {
        id,
        title: "Rust (programming language)".to_owned(),
        char_count,
        content: format!("revision {id}"),
        last_edit: timestamp.to_owned(),
        editor: "fixture".to_owned(),
        links: vec!["Cargo".to_owned()],
        timestamp: at(timestamp),
        diff: json!({ "added": [], "removed": [] }),
        total_views,
        average_daily_views,
    })
    .expect("fixture snapshots are valid")
}

/// Snapshot with a custom title and view count.
pub(crate) fn snapshot(id: i64, title: &str, timestamp: &str, total_views: i64) -> Snapshot {
    let base = snapshot_with(id, timestamp, 1_000, total_views, 3_000);
    Snapshot::new(SnapshotDraft {
        id,
        title: title.to_owned(),
        char_count: base.char_count(),
        content: base.content().to_owned(),
        last_edit: base.last_edit().to_owned(),
        editor: base.editor().to_owned(),
        links: base.links().to_vec(),
        timestamp: base.timestamp(),
        diff: base.diff().clone(),
        total_views,
        average_daily_views: base.average_daily_views(),
    })
    .expect("fixture snapshots are valid")
}
