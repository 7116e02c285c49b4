//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MRL Compliance API",
        version = "0.1.0",
        description = "Pesticide residue compliance verdicts against EU and Codex maximum residue limits, with alternative-substance recommendations.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::compliance::check,
        crate::routes::compliance::batch,
        crate::routes::compliance::alternatives,
        crate::routes::crops::list_substances,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::compliance::CheckRequest,
        crate::routes::compliance::AssessmentResponse,
        crate::routes::compliance::BatchItemRequest,
        crate::routes::compliance::BatchRequest,
        crate::routes::compliance::BatchResponse,
        crate::routes::compliance::AlternativesRequest,
        crate::routes::compliance::AlternativesResponse,
        crate::routes::crops::SubstancesResponse,
    )),
    tags(
        (name = "compliance", description = "MRL compliance checks and alternatives"),
        (name = "crops", description = "Per-crop regulatory records"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
