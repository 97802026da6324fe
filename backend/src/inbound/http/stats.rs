//! Aggregate statistics endpoint.
//!
//! ```text
//! GET /stats/
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{BasicStats, Error, ViewsEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Message returned with 200 when the store holds no records.
pub const NO_DATA_MESSAGE: &str = "no data available for analysis";

/// Statistics over the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatsReport {
    pub basic_stats: BasicStats,
    pub min_views_entry: Option<ViewsEntry>,
    pub max_views_entry: Option<ViewsEntry>,
}

/// Sentinel body for an empty store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoDataResponse {
    #[schema(example = "no data available for analysis")]
    pub error: String,
}

/// Either the report or the empty-store sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StatsResponse {
    Report(StatsReport),
    NoData(NoDataResponse),
}

impl StatsResponse {
    fn no_data() -> Self {
        Self::NoData(NoDataResponse {
            error: NO_DATA_MESSAGE.to_owned(),
        })
    }
}

/// Summarise the store.
///
/// An empty store is not an error: the body carries the `error` sentinel with
/// status 200.
#[utoipa::path(
    get,
    path = "/stats/",
    responses(
        (status = 200, description = "Statistics, or the no-data sentinel", body = StatsResponse),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["stats"],
    operation_id = "getStats"
)]
#[get("/stats/")]
pub async fn get_stats(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let frame = state.analyzer.load().await?;
    let Some(basic_stats) = state.analyzer.basic_stats(&frame) else {
        info!("stats requested on an empty store");
        return Ok(HttpResponse::Ok().json(StatsResponse::no_data()));
    };
    let min_views_entry = state.snapshots.min_views_entry().await?;
    let max_views_entry = state.snapshots.max_views_entry().await?;
    Ok(HttpResponse::Ok().json(StatsResponse::Report(StatsReport {
        basic_stats,
        min_views_entry,
        max_views_entry,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::App;
    use actix_web::test::{TestRequest, call_service, init_service, read_body_json};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockSnapshotRepository, SnapshotRepositoryError};
    use crate::inbound::http::test_utils::{state_for, state_with, three_days};

    async fn call(state: web::Data<HttpState>) -> (StatusCode, Value) {
        let app = init_service(App::new().app_data(state).service(get_stats)).await;
        let res =
            call_service(&app, TestRequest::get().uri("/stats/").to_request()).await;
        let status = res.status();
        (status, read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn reports_max_views_and_latest_day() {
        let (status, body) = call(state_with(three_days())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["basic_stats"],
            json!({
                "total_entries": 3,
                "average_char_count": 1050,
                "total_views": 150,
                "last_update": "2024-01-03",
            })
        );
        assert_eq!(body["min_views_entry"]["id"], 1);
        assert_eq!(body["min_views_entry"]["views"], 100);
        assert_eq!(body["max_views_entry"]["id"], 2);
        assert_eq!(body["max_views_entry"]["views"], 150);
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_store_returns_sentinel_with_ok() {
        let (status, body) = call(state_with(Vec::new())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": NO_DATA_MESSAGE }));
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_store_skips_extreme_queries() {
        let mut repo = MockSnapshotRepository::new();
        repo.expect_load_all().times(1).return_once(|| Ok(Vec::new()));
        repo.expect_min_views_entry().never();
        repo.expect_max_views_entry().never();
        let (status, _) = call(state_for(Arc::new(repo))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn load_failure_surfaces_as_error() {
        let mut repo = MockSnapshotRepository::new();
        repo.expect_load_all()
            .times(1)
            .return_once(|| Err(SnapshotRepositoryError::query("no such table: wiki_history")));
        let (status, body) = call(state_for(Arc::new(repo))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "internal_error");
    }

    #[rstest]
    fn report_round_trips_through_untagged_enum() {
        let raw = json!({ "error": NO_DATA_MESSAGE });
        let parsed: StatsResponse = serde_json::from_value(raw).expect("sentinel parses");
        assert_eq!(parsed, StatsResponse::no_data());
    }
}
