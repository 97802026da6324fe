//! Test utilities for the crate.
//!
//! Shared by unit tests and the integration suites under `tests/`. Only
//! compiled for tests or with the `test-support` feature.

pub mod sqlite {
    //! Temporary SQLite record stores seeded with raw rows.
    //!
    //! Rows are inserted with plain SQL so tests can store values the
    //! repository must reject, such as malformed JSON or NULL counters.

    use std::io;
    use std::path::PathBuf;

    use chrono::NaiveDateTime;
    use diesel::sql_types::{BigInt, Nullable, Text, Timestamp};
    use diesel::{Connection, RunQueryDsl, SqliteConnection};
    use tempfile::TempDir;

    use crate::outbound::persistence::run_migrations;

    const INSERT_SQL: &str = "INSERT INTO wiki_history \
        (id, title, char_count, content, last_edit, editor, links, timestamp, diff, \
         total_views, average_daily_views) \
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

    /// One stored row, with JSON columns kept as raw text.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SeedRow {
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

    impl SeedRow {
        /// A well-formed row observed at `timestamp` (`YYYY-MM-DDTHH:MM:SS`).
        ///
        /// # Panics
        ///
        /// Panics when `timestamp` is not a valid ISO-8601 local time.
        pub fn new(id: i64, title: &str, timestamp: &str, total_views: i64) -> Self {
            Self {
                id,
                title: Some(title.to_owned()),
                char_count: Some(1_000),
                content: Some(format!("revision {id}")),
                last_edit: Some(timestamp.to_owned()),
                editor: Some("seed".to_owned()),
                links: Some(r#"["Cargo", "LLVM"]"#.to_owned()),
                timestamp: Some(timestamp.parse().expect("seed timestamps are valid")),
                diff: Some(r#"{"added": ["Ownership"], "removed": []}"#.to_owned()),
                total_views: Some(total_views),
                average_daily_views: Some(3_000),
            }
        }

        /// Override the character count.
        #[must_use]
        pub fn with_char_count(mut self, char_count: i64) -> Self {
            self.char_count = Some(char_count);
            self
        }

        /// Override the average daily views.
        #[must_use]
        pub fn with_average_daily_views(mut self, average: i64) -> Self {
            self.average_daily_views = Some(average);
            self
        }
    }

    /// A migrated SQLite file inside a temporary directory.
    ///
    /// The directory and database are removed on drop.
    #[derive(Debug)]
    pub struct TempStore {
        _dir: TempDir,
        path: PathBuf,
    }

    impl TempStore {
        /// Create an empty, migrated store.
        ///
        /// # Errors
        ///
        /// Returns an I/O error when the directory or schema cannot be
        /// created.
        pub fn new() -> io::Result<Self> {
            let dir = TempDir::new()?;
            let path = dir.path().join("wiki_history.db");
            run_migrations(&path.to_string_lossy()).map_err(io::Error::other)?;
            Ok(Self { _dir: dir, path })
        }

        /// Create a store holding `rows`.
        ///
        /// # Errors
        ///
        /// As [`TempStore::new`] and [`TempStore::insert`].
        pub fn seeded(rows: &[SeedRow]) -> io::Result<Self> {
            let store = Self::new()?;
            store.insert(rows)?;
            Ok(store)
        }

        /// Path as the string the pool configuration expects.
        pub fn database_path(&self) -> String {
            self.path.to_string_lossy().into_owned()
        }

        /// Insert raw rows.
        ///
        /// # Errors
        ///
        /// Returns an I/O error wrapping the connection or SQL failure.
        pub fn insert(&self, rows: &[SeedRow]) -> io::Result<()> {
            let mut conn =
                SqliteConnection::establish(&self.database_path()).map_err(io::Error::other)?;
            for row in rows {
                diesel::sql_query(INSERT_SQL)
                    .bind::<BigInt, _>(row.id)
                    .bind::<Nullable<Text>, _>(row.title.as_deref())
                    .bind::<Nullable<BigInt>, _>(row.char_count)
                    .bind::<Nullable<Text>, _>(row.content.as_deref())
                    .bind::<Nullable<Text>, _>(row.last_edit.as_deref())
                    .bind::<Nullable<Text>, _>(row.editor.as_deref())
                    .bind::<Nullable<Text>, _>(row.links.as_deref())
                    .bind::<Nullable<Timestamp>, _>(row.timestamp)
                    .bind::<Nullable<Text>, _>(row.diff.as_deref())
                    .bind::<Nullable<BigInt>, _>(row.total_views)
                    .bind::<Nullable<BigInt>, _>(row.average_daily_views)
                    .execute(&mut conn)
                    .map_err(io::Error::other)?;
            }
            Ok(())
        }
    }
}
