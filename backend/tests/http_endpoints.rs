//! End-to-end HTTP tests over a seeded SQLite store.
//!
//! Handlers run against `DieselSnapshotRepository`, so these cover query
//! validation, SQL ordering and the response envelopes together.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use wiki_history::Trace;
use wiki_history::charts::ChartStyle;
use wiki_history::inbound::http::history::list_wiki_history;
use wiki_history::inbound::http::plots::plot_views;
use wiki_history::inbound::http::state::HttpState;
use wiki_history::inbound::http::stats::get_stats;
use wiki_history::inbound::http::validation::query_config;
use wiki_history::outbound::persistence::{DbPool, DieselSnapshotRepository, PoolConfig};
use wiki_history::test_support::sqlite::{SeedRow, TempStore};

#[fixture]
fn three_days() -> Vec<SeedRow> {
    vec![
        SeedRow::new(1, "Rust", "2024-01-01T08:00:00", 100).with_char_count(1_000),
        SeedRow::new(2, "Rust", "2024-01-02T08:00:00", 150).with_char_count(1_100),
        SeedRow::new(3, "Rust", "2024-01-03T08:00:00", 120).with_char_count(1_050),
    ]
}

async fn state(store: &TempStore) -> web::Data<HttpState> {
    let pool = DbPool::new(PoolConfig::new(store.database_path()))
        .await
        .expect("pool builds");
    web::Data::new(HttpState::new(
        Arc::new(DieselSnapshotRepository::new(pool)),
        ChartStyle::default(),
    ))
}

async fn get(store: &TempStore, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(state(store).await)
            .app_data(query_config())
            .wrap(Trace)
            .service(list_wiki_history)
            .service(get_stats),
    )
    .await;
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn stats_report_maximum_views_and_latest_day(three_days: Vec<SeedRow>) {
    let store = TempStore::seeded(&three_days).expect("seed store");

    let (status, body) = get(&store, "/stats/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basic_stats"]["total_entries"], 3);
    assert_eq!(body["basic_stats"]["average_char_count"], 1050);
    assert_eq!(body["basic_stats"]["total_views"], 150);
    assert_eq!(body["basic_stats"]["last_update"], "2024-01-03");
    assert_eq!(body["min_views_entry"], json!({"id": 1, "title": "Rust", "views": 100}));
    assert_eq!(body["max_views_entry"], json!({"id": 2, "title": "Rust", "views": 150}));
}

#[rstest]
#[actix_web::test]
async fn stats_on_empty_store_return_sentinel() {
    let store = TempStore::new().expect("empty store");

    let (status, body) = get(&store, "/stats/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "no data available for analysis"}));
}

#[rstest]
#[actix_web::test]
async fn oversized_limit_is_rejected_with_trace_id() {
    let rows: Vec<SeedRow> = (1..=8)
        .map(|id| SeedRow::new(id, "Rust", "2024-01-01T08:00:00", id * 10))
        .collect();
    let store = TempStore::seeded(&rows).expect("seed store");

    let (status, body) = get(&store, "/wiki_history/?limit=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "limit");
    assert!(body["traceId"].is_string());

    let (status, body) = get(&store, "/wiki_history/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(5));
}

#[rstest]
#[actix_web::test]
async fn listing_sorts_by_views_descending(three_days: Vec<SeedRow>) {
    let store = TempStore::seeded(&three_days).expect("seed store");

    let (status, body) = get(&store, "/wiki_history/?sort_by=total_views&order=desc").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|row| row["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(body[0]["links"], json!(["Cargo", "LLVM"]));
}

#[rstest]
#[actix_web::test]
async fn corrupt_rows_surface_as_redacted_internal_errors(three_days: Vec<SeedRow>) {
    let store = TempStore::seeded(&three_days).expect("seed store");
    let mut broken = SeedRow::new(4, "Rust", "2024-01-04T08:00:00", 90);
    broken.links = Some("not json".to_owned());
    store.insert(&[broken]).expect("insert broken row");

    let (status, body) = get(&store, "/stats/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn views_plot_renders_from_sqlite(three_days: Vec<SeedRow>) {
    let store = TempStore::seeded(&three_days).expect("seed store");
    let app = test::init_service(
        App::new()
            .app_data(state(&store).await)
            .service(plot_views),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/plots/views").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert!(body.starts_with(b"<img src='data:image/png;base64, "));
}
