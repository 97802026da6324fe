//! Snapshot listing endpoint.
//!
//! ```text
//! GET /wiki_history/?skip=0&limit=5&title=Rust&sort_by=total_views&order=desc
//! ```

use actix_web::{HttpResponse, get, web};
use tracing::debug;

use crate::domain::{Error, Snapshot, SnapshotQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::ListSnapshotsParams;

/// List snapshot records.
///
/// At most five records are returned per page; larger limits are rejected.
#[utoipa::path(
    get,
    path = "/wiki_history/",
    params(ListSnapshotsParams),
    responses(
        (status = 200, description = "Page of snapshot records", body = [Snapshot]),
        (status = 400, description = "Invalid query parameters", body = Error),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["wiki_history"],
    operation_id = "listWikiHistory"
)]
#[get("/wiki_history/")]
pub async fn list_wiki_history(
    state: web::Data<HttpState>,
    params: web::Query<ListSnapshotsParams>,
) -> ApiResult<HttpResponse> {
    let query = SnapshotQuery::try_from(params.into_inner())?;
    debug!(
        skip = query.page.skip(),
        limit = query.page.limit(),
        sort_by = query.sort_by.as_str(),
        order = query.order.as_str(),
        "listing snapshots"
    );
    let page = state.snapshots.list(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}
