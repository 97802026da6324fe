//! Internal Diesel row structs for the record store.
//!
//! These types never leave the persistence layer.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::wiki_history;

/// Row struct for reading snapshots.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wiki_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SnapshotRow {
    pub id: i64,
    pub title: Option<String>,
    pub char_count: Option<i64>,
    pub content: Option<String>,
    pub last_edit: Option<String>,
    pub editor: Option<String>,
    pub links: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub diff: Option<String>,
    pub total_views: Option<i64>,
    pub average_daily_views: Option<i64>,
}

/// Row struct for the min/max views projection.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wiki_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ViewsRow {
    pub id: i64,
    pub title: Option<String>,
    pub total_views: Option<i64>,
}
