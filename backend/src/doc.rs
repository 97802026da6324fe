//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the response schemas. It is
//! served by Swagger UI under `/docs/` and printed by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::domain::{BasicStats, Error, ErrorCode, Snapshot, SortKey, SortOrder, ViewsEntry};
use crate::inbound::http::stats::{NoDataResponse, StatsReport, StatsResponse};

/// Location of the generated document.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wikipedia Article API",
        description = "Read-only access to stored snapshots of a Wikipedia article, aggregate statistics and charts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::history::list_wiki_history,
        crate::inbound::http::stats::get_stats,
        crate::inbound::http::plots::plot_content_evolution,
        crate::inbound::http::plots::plot_views,
        crate::inbound::http::docs::root_redirect,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Snapshot,
        ViewsEntry,
        BasicStats,
        StatsReport,
        NoDataResponse,
        StatsResponse,
        SortKey,
        SortOrder,
        Error,
        ErrorCode
    )),
    tags(
        (name = "wiki_history", description = "Snapshot records"),
        (name = "stats", description = "Aggregate statistics"),
        (name = "plots", description = "Rendered charts"),
        (name = "docs", description = "Documentation entry point"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
