//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wiki_history::Trace;
use wiki_history::doc::{ApiDoc, OPENAPI_JSON_PATH};
use wiki_history::inbound::http::docs::root_redirect;
use wiki_history::inbound::http::health::{HealthState, live, ready};
use wiki_history::inbound::http::history::list_wiki_history;
use wiki_history::inbound::http::plots::{plot_content_evolution, plot_views};
use wiki_history::inbound::http::state::HttpState;
use wiki_history::inbound::http::stats::get_stats;
use wiki_history::inbound::http::validation::query_config;
use wiki_history::outbound::persistence::DieselSnapshotRepository;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(query_config())
        .wrap(Trace)
        .service(root_redirect)
        .service(list_wiki_history)
        .service(get_stats)
        .service(plot_content_evolution)
        .service(plot_views)
        .service(ready)
        .service(live)
        .service(SwaggerUi::new("/docs/{_:.*}").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}

/// Construct an Actix HTTP server.
///
/// Readiness is flipped once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        host,
        port,
        db_pool,
        chart_style,
    } = config;
    let repository = Arc::new(DieselSnapshotRepository::new(db_pool));
    let http_state = web::Data::new(HttpState::new(repository, chart_style));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind((host.as_str(), port))?
    .run();

    health_state.mark_ready();
    info!(%host, port, "listening");
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use rstest::rstest;
    use wiki_history::domain::ports::FixtureSnapshotRepository;

    use super::*;

    fn deps() -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(HttpState::new(
                Arc::new(FixtureSnapshotRepository::default()),
                Default::default(),
            )),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn root_redirects_to_swagger_ui() {
        let app = test::init_service(build_app(deps())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/docs/")
        );
        assert!(res.headers().contains_key("trace-id"));
    }

    #[rstest]
    #[actix_web::test]
    async fn serves_openapi_document() {
        let app = test::init_service(build_app(deps())).await;
        let req = test::TestRequest::get().uri(OPENAPI_JSON_PATH).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["info"]["title"], "Wikipedia Article API");
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_query_uses_error_envelope() {
        let app = test::init_service(build_app(deps())).await;
        let req = test::TestRequest::get()
            .uri("/wiki_history/?limit=1&limit=2")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
