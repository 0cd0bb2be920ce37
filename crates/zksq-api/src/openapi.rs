//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented session routes into a single OpenAPI
//! spec served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "zksq API — Magic Square ZK Demonstration",
        version = "0.1.0",
        description = "Session workflow for the interactive zero-knowledge magic-square demonstration.\n\nA session walks two parties through one proof: the Prover fills the missing cells of a 3×3 magic square and generates a proof of the solution; the Verifier checks the proof against the public verification key without learning the filled-in values.\n\nAll endpoints are unauthenticated — the API backs a single-user demonstration page.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::sessions::create_session,
        crate::routes::sessions::get_session,
        crate::routes::sessions::edit_cell,
        crate::routes::sessions::prove,
        crate::routes::sessions::advance,
        crate::routes::sessions::verify,
        crate::routes::sessions::reset,
        crate::routes::sessions::load_solution,
        crate::routes::sessions::set_reveal,
    ),
    components(schemas(
        crate::routes::sessions::SessionView,
        crate::routes::sessions::GridView,
        crate::routes::sessions::CellView,
        crate::routes::sessions::OutcomeView,
        crate::routes::sessions::EditCellRequest,
        crate::routes::sessions::RevealRequest,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "sessions", description = "Demonstration session workflow")
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
