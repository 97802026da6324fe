//! Diesel table definition for the SQLite record store.
//!
//! Must match `migrations/` exactly. Every column except `id` is nullable in
//! the stored schema; the repository decides which NULLs are tolerated.

diesel::table! {
    /// Periodic snapshots of one Wikipedia article's metadata.
    wiki_history (id) {
        /// Stable integer identifier.
        id -> BigInt,
        /// Article title (at most 200 characters).
        title -> Nullable<Text>,
        /// Article length in characters.
        char_count -> Nullable<BigInt>,
        /// Article text at observation time.
        content -> Nullable<Text>,
        /// Last edit marker as reported upstream (at most 100 characters).
        last_edit -> Nullable<Text>,
        /// Last editor (at most 100 characters).
        editor -> Nullable<Text>,
        /// JSON array of linked article titles.
        links -> Nullable<Text>,
        /// Observation time.
        timestamp -> Nullable<Timestamp>,
        /// JSON edit delta.
        diff -> Nullable<Text>,
        /// Total page views.
        total_views -> Nullable<BigInt>,
        /// Average page views per day.
        average_daily_views -> Nullable<BigInt>,
    }
}
