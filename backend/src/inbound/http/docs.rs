//! Root redirect to the interactive API documentation.

use actix_web::{HttpResponse, get, http::header};

/// Path Swagger UI is mounted on.
pub const DOCS_PATH: &str = "/docs/";

/// Send browsers hitting `/` to the documentation UI.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 307, description = "Redirect to the documentation UI",
            headers(("Location" = String, description = "Documentation path")))
    ),
    tags = ["docs"],
    operation_id = "rootRedirect"
)]
#[get("/")]
pub async fn root_redirect() -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, DOCS_PATH))
        .finish()
}
