//! # Crop API
//!
//! Read-only listing of the regulatory records published for a crop.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mrl_core::RegulatoryRecord;

use crate::error::AppError;
use crate::state::AppState;

/// Records for one crop, approved substances first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubstancesResponse {
    pub crop: String,
    pub count: usize,
    pub approved: usize,
    #[schema(value_type = Vec<Object>)]
    pub substances: Vec<RegulatoryRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/crops/{crop}/substances", get(list_substances))
}

/// GET /v1/crops/{crop}/substances: All substances with records for a crop.
#[utoipa::path(
    get,
    path = "/v1/crops/{crop}/substances",
    params(("crop" = String, Path, description = "Crop name (case-insensitive)")),
    responses(
        (status = 200, description = "Records for the crop (may be empty)", body = SubstancesResponse),
        (status = 422, description = "Invalid crop name", body = crate::error::ErrorBody),
        (status = 503, description = "Record store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "crops"
)]
pub(crate) async fn list_substances(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> Result<Json<SubstancesResponse>, AppError> {
    let records = state.checker.substances_for_crop(&crop).await?;
    Ok(Json(SubstancesResponse {
        crop: crop.trim().to_string(),
        count: records.len(),
        approved: records.iter().filter(|r| r.eu_status.is_approved()).count(),
        substances: records,
    }))
}
