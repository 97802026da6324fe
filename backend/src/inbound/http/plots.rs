//! Chart endpoints returning inline PNG images.
//!
//! ```text
//! GET /plots/content/evolution
//! GET /plots/views
//! ```
//!
//! Rasterisation is CPU bound, so figures are built and rendered on the
//! blocking pool with the request trace identifier carried across.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, error};

use crate::charts::{ChartError, Figure, Visualizer};
use crate::domain::{Error, TraceId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn map_chart_error(err: ChartError) -> Error {
    error!(error = %err, "chart rendering failed");
    Error::internal(format!("chart rendering failed: {err}"))
}

/// Wrap PNG bytes in an `<img>` tag with a base64 data URI.
pub fn inline_png(png: &[u8]) -> String {
    format!(
        "<img src='data:image/png;base64, {}' />",
        STANDARD.encode(png)
    )
}

async fn render_inline<F>(visualizer: Visualizer, build: F) -> ApiResult<HttpResponse>
where
    F: FnOnce(&Visualizer) -> Figure + Send + 'static,
{
    let trace_id = TraceId::current();
    let png = web::block(move || {
        TraceId::sync_scope(trace_id, || {
            let figure = build(&visualizer);
            debug!(title = figure.title(), "rendering chart");
            visualizer.render_png(&figure)
        })
    })
    .await
    .map_err(|err| Error::internal(format!("chart task failed: {err}")))?
    .map_err(map_chart_error)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(inline_png(&png)))
}

/// Character count over time.
#[utoipa::path(
    get,
    path = "/plots/content/evolution",
    responses(
        (status = 200, description = "HTML image tag embedding a PNG", body = String, content_type = "text/html"),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["plots"],
    operation_id = "plotContentEvolution"
)]
#[get("/plots/content/evolution")]
pub async fn plot_content_evolution(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let frame = state.analyzer.load().await?;
    render_inline(state.visualizer.clone(), move |visualizer| {
        visualizer.plot_content_evolution(&frame)
    })
    .await
}

/// Total views and average daily views per calendar day.
#[utoipa::path(
    get,
    path = "/plots/views",
    responses(
        (status = 200, description = "HTML image tag embedding a PNG", body = String, content_type = "text/html"),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["plots"],
    operation_id = "plotViews"
)]
#[get("/plots/views")]
pub async fn plot_views(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let frame = state.analyzer.load().await?;
    let daily = state.analyzer.daily_stats(&frame);
    render_inline(state.visualizer.clone(), move |visualizer| {
        visualizer.plot_views(&daily)
    })
    .await
}
