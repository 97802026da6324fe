//! Integration tests for `DieselSnapshotRepository` against temporary SQLite
//! files.
//!
//! Each test seeds a fresh migrated store through raw SQL so malformed rows
//! can be stored alongside valid ones.

use std::sync::Arc;

use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::json;
use wiki_history::domain::ports::{SnapshotRepository, SnapshotRepositoryError};
use wiki_history::domain::{Snapshot, SnapshotQuery, SortKey, SortOrder};
use wiki_history::outbound::persistence::{DbPool, DieselSnapshotRepository, PoolConfig};
use wiki_history::test_support::sqlite::{SeedRow, TempStore};

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

#[fixture]
fn rows() -> Vec<SeedRow> {
    vec![
        SeedRow::new(1, "Rust", "2024-01-01T08:00:00", 100),
        SeedRow::new(2, "Rustacean", "2024-01-02T08:00:00", 150),
        SeedRow::new(3, "Rust", "2024-01-03T08:00:00", 120),
        SeedRow::new(4, "100% Rust", "2024-01-04T08:00:00", 150),
        SeedRow::new(5, "rust_lang", "2024-01-05T08:00:00", 90),
        SeedRow::new(6, "Cargo", "2024-01-06T08:00:00", 130),
    ]
}

async fn repository(store: &TempStore) -> Arc<dyn SnapshotRepository> {
    let pool = DbPool::new(PoolConfig::new(store.database_path()))
        .await
        .expect("pool builds");
    Arc::new(DieselSnapshotRepository::new(pool))
}

fn ids(snapshots: &[Snapshot]) -> Vec<i64> {
    snapshots.iter().map(Snapshot::id).collect()
}

fn page(skip: i64, limit: i64) -> SnapshotQuery {
    SnapshotQuery::with_page(PageRequest::new(skip, limit).expect("valid page"))
}

// -----------------------------------------------------------------------------
// Listing
// -----------------------------------------------------------------------------

#[rstest]
#[case(SortKey::Id, SortOrder::Asc, vec![1, 2, 3, 4, 5])]
#[case(SortKey::Id, SortOrder::Desc, vec![6, 5, 4, 3, 2])]
#[case(SortKey::TotalViews, SortOrder::Desc, vec![2, 4, 6, 3, 1])]
#[case(SortKey::TotalViews, SortOrder::Asc, vec![5, 1, 3, 6, 2])]
#[case(SortKey::Timestamp, SortOrder::Desc, vec![6, 5, 4, 3, 2])]
#[case(SortKey::AverageDailyViews, SortOrder::Asc, vec![1, 2, 3, 4, 5])]
#[tokio::test]
async fn list_orders_with_id_tie_break(
    rows: Vec<SeedRow>,
    #[case] key: SortKey,
    #[case] order: SortOrder,
    #[case] expected: Vec<i64>,
) {
    let store = TempStore::seeded(&rows).expect("seed store");
    let repo = repository(&store).await;

    let listed = repo
        .list(&page(0, 5).sorted(key, order))
        .await
        .expect("list succeeds");

    assert_eq!(ids(&listed), expected);
}

#[rstest]
#[case("rust", vec![1, 2, 3, 4, 5])]
#[case("%", vec![4])]
#[case("_", vec![5])]
#[case("Rustacean", vec![2])]
#[case("Haskell", vec![])]
#[tokio::test]
async fn title_filter_is_a_literal_case_insensitive_substring(
    rows: Vec<SeedRow>,
    #[case] needle: &str,
    #[case] expected: Vec<i64>,
) {
    let store = TempStore::seeded(&rows).expect("seed store");
    let repo = repository(&store).await;

    let listed = repo
        .list(&page(0, 5).title_contains(Some(needle.to_owned())))
        .await
        .expect("list succeeds");

    assert_eq!(ids(&listed), expected);
}

#[rstest]
#[tokio::test]
async fn skip_and_limit_window_the_result(rows: Vec<SeedRow>) {
    let store = TempStore::seeded(&rows).expect("seed store");
    let repo = repository(&store).await;

    assert_eq!(ids(&repo.list(&page(4, 5)).await.expect("list")), vec![5, 6]);
    assert_eq!(ids(&repo.list(&page(1, 2)).await.expect("list")), vec![2, 3]);
    assert!(repo.list(&page(10, 5)).await.expect("list").is_empty());
    assert!(repo.list(&page(0, 0)).await.expect("list").is_empty());
}

// -----------------------------------------------------------------------------
// Full loads and extremes
// -----------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn load_all_decodes_json_columns_in_id_order(rows: Vec<SeedRow>) {
    let mut shuffled = rows;
    shuffled.reverse();
    let store = TempStore::seeded(&shuffled).expect("seed store");
    let repo = repository(&store).await;

    let all = repo.load_all().await.expect("load succeeds");

    assert_eq!(ids(&all), vec![1, 2, 3, 4, 5, 6]);
    let first = &all[0];
    assert_eq!(first.links(), ["Cargo", "LLVM"]);
    assert_eq!(first.diff(), &json!({"added": ["Ownership"], "removed": []}));
    assert_eq!(first.timestamp().to_string(), "2024-01-01 08:00:00");
}

#[rstest]
#[tokio::test]
async fn extremes_break_ties_by_lowest_id(rows: Vec<SeedRow>) {
    let store = TempStore::seeded(&rows).expect("seed store");
    let repo = repository(&store).await;

    let max = repo.max_views_entry().await.expect("max").expect("entry");
    let min = repo.min_views_entry().await.expect("min").expect("entry");

    assert_eq!((max.id, max.title.as_str(), max.views), (2, "Rustacean", 150));
    assert_eq!((min.id, min.title.as_str(), min.views), (5, "rust_lang", 90));
}

#[rstest]
#[tokio::test]
async fn empty_store_has_no_rows_or_extremes() {
    let store = TempStore::new().expect("empty store");
    let repo = repository(&store).await;

    assert!(repo.load_all().await.expect("load").is_empty());
    assert!(repo.min_views_entry().await.expect("min").is_none());
    assert!(repo.max_views_entry().await.expect("max").is_none());
}

// -----------------------------------------------------------------------------
// Integrity failures
// -----------------------------------------------------------------------------

#[rstest]
#[tokio::test]
async fn malformed_diff_fails_the_whole_load(rows: Vec<SeedRow>) {
    let store = TempStore::seeded(&rows).expect("seed store");
    let mut broken = SeedRow::new(7, "Rust", "2024-01-07T08:00:00", 10);
    broken.diff = Some("{not json".to_owned());
    store.insert(&[broken]).expect("insert broken row");
    let repo = repository(&store).await;

    let err = repo.load_all().await.expect_err("decode failure");

    assert!(matches!(
        err,
        SnapshotRepositoryError::Decode { ref field, .. } if field == "diff"
    ));
}

#[rstest]
#[tokio::test]
async fn null_descriptive_text_decodes_to_empty_strings() {
    let mut row = SeedRow::new(1, "Rust", "2024-01-01T08:00:00", 100);
    row.title = None;
    row.editor = None;
    let store = TempStore::seeded(&[row]).expect("seed store");
    let repo = repository(&store).await;

    let all = repo.load_all().await.expect("load succeeds");

    assert_eq!(all[0].title(), "");
    assert_eq!(all[0].editor(), "");
}

#[rstest]
#[tokio::test]
async fn missing_table_is_a_query_error() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("bare.db");
    let pool = DbPool::new(PoolConfig::new(path.to_string_lossy()))
        .await
        .expect("pool builds");
    let repo = DieselSnapshotRepository::new(pool);

    let err = repo.load_all().await.expect_err("no table");

    assert!(matches!(err, SnapshotRepositoryError::Query { .. }));
}
