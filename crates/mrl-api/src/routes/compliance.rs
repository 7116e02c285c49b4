//! # Compliance API
//!
//! | Method | Path                          | Operation                          |
//! |--------|-------------------------------|------------------------------------|
//! | POST   | `/v1/compliance/check`        | One verdict, with alternatives     |
//! | POST   | `/v1/compliance/batch`        | Verdicts for many substances       |
//! | POST   | `/v1/compliance/alternatives` | Ranked substitutes for a substance |
//!
//! Request bodies carry raw names and market strings. They are validated by
//! the domain parsers; failures come back as 422 `VALIDATION_ERROR`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mrl_engine::{
    Alternatives, Assessment, BatchItem, Candidate, ComplianceQuery, ComplianceStatus,
    ComplianceVerdict,
};

use crate::error::AppError;
use crate::extractors::{read_body, RequestBody};
use crate::state::AppState;

/// Largest batch accepted in one request.
pub const MAX_BATCH_ITEMS: usize = 200;

/// Largest candidate list a caller may ask for.
pub const MAX_ALTERNATIVES: usize = 100;

/// Check one substance on one crop for one market.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckRequest {
    pub crop: String,
    pub substance: String,
    /// "EU" or "Codex" (case-insensitive).
    pub market: String,
    /// Measured residue in mg/kg. Omit for an approval-only check.
    #[serde(default)]
    pub residue: Option<f64>,
    /// Attach alternatives when the verdict calls for them (default: true).
    #[serde(default)]
    pub include_alternatives: Option<bool>,
    /// Evaluation date for expiry notices (default: today).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl RequestBody for CheckRequest {
    const NAME: &'static str = "compliance check request";
}

/// A verdict with optional substitutes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResponse {
    #[schema(value_type = Object)]
    pub verdict: ComplianceVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub alternatives: Option<Alternatives>,
}

impl From<Assessment> for AssessmentResponse {
    fn from(a: Assessment) -> Self {
        Self {
            verdict: a.verdict,
            alternatives: a.alternatives,
        }
    }
}

/// One substance of a batch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchItemRequest {
    pub substance: String,
    #[serde(default)]
    pub residue: Option<f64>,
}

/// Check many substances on one crop for one market.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub crop: String,
    pub market: String,
    pub items: Vec<BatchItemRequest>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl RequestBody for BatchRequest {
    const NAME: &'static str = "batch request";

    fn check_limits(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("items must not be empty".into());
        }
        if self.items.len() > MAX_BATCH_ITEMS {
            return Err(format!(
                "too many items: {} (maximum {MAX_BATCH_ITEMS})",
                self.items.len()
            ));
        }
        Ok(())
    }
}

/// Verdicts in request order, with a status tally.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchResponse {
    pub count: usize,
    pub compliant: usize,
    pub warning: usize,
    pub non_compliant: usize,
    pub unknown: usize,
    #[schema(value_type = Vec<Object>)]
    pub verdicts: Vec<ComplianceVerdict>,
}

impl BatchResponse {
    fn new(verdicts: Vec<ComplianceVerdict>) -> Self {
        let tally = |status| verdicts.iter().filter(|v| v.status == status).count();
        Self {
            count: verdicts.len(),
            compliant: tally(ComplianceStatus::Compliant),
            warning: tally(ComplianceStatus::Warning),
            non_compliant: tally(ComplianceStatus::NonCompliant),
            unknown: tally(ComplianceStatus::Unknown),
            verdicts,
        }
    }
}

/// Ask for substitutes for a failing substance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AlternativesRequest {
    pub crop: String,
    pub market: String,
    pub exclude_substance: String,
    /// Restrict to this pesticide type (substring, case-insensitive).
    #[serde(default)]
    pub same_type_as: Option<String>,
    /// Maximum number of candidates returned.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RequestBody for AlternativesRequest {
    const NAME: &'static str = "alternatives request";

    fn check_limits(&self) -> Result<(), String> {
        match self.limit {
            Some(0) => Err("limit must be at least 1".into()),
            Some(n) if n > MAX_ALTERNATIVES => {
                Err(format!("limit must be at most {MAX_ALTERNATIVES}"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AlternativesResponse {
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub candidates: Vec<Candidate>,
}

/// Build the compliance router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/compliance/check", post(check))
        .route("/v1/compliance/batch", post(batch))
        .route("/v1/compliance/alternatives", post(alternatives))
}

/// POST /v1/compliance/check: Evaluate one query.
#[utoipa::path(
    post,
    path = "/v1/compliance/check",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Verdict", body = AssessmentResponse),
        (status = 400, description = "Malformed JSON", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid query", body = crate::error::ErrorBody),
        (status = 503, description = "Record store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
pub(crate) async fn check(
    State(state): State<AppState>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let req = read_body(body)?;
    let query = ComplianceQuery::parse(
        &req.crop,
        &req.substance,
        &req.market,
        req.residue,
        req.as_of.unwrap_or_else(today),
    )?;

    let assessment = if req.include_alternatives.unwrap_or(true) {
        state.checker.assess(&query).await?
    } else {
        Assessment {
            verdict: state.checker.evaluate(&query).await?,
            alternatives: None,
        }
    };

    tracing::info!(
        crop = %query.crop,
        substance = %query.substance,
        market = %query.market,
        status = %assessment.verdict.status,
        "compliance check"
    );
    Ok(Json(assessment.into()))
}

/// POST /v1/compliance/batch: Evaluate many substances.
#[utoipa::path(
    post,
    path = "/v1/compliance/batch",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Verdicts in request order", body = BatchResponse),
        (status = 422, description = "Invalid batch", body = crate::error::ErrorBody),
        (status = 503, description = "Record store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
pub(crate) async fn batch(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, AppError> {
    let req = read_body(body)?;
    let items: Vec<BatchItem> = req
        .items
        .into_iter()
        .map(|i| BatchItem::new(i.substance, i.residue))
        .collect();

    let verdicts = state
        .checker
        .check_batch_on(&req.crop, &req.market, &items, req.as_of.unwrap_or_else(today))
        .await?;
    Ok(Json(BatchResponse::new(verdicts)))
}

/// POST /v1/compliance/alternatives: Rank substitutes.
#[utoipa::path(
    post,
    path = "/v1/compliance/alternatives",
    request_body = AlternativesRequest,
    responses(
        (status = 200, description = "Ranked candidates (may be empty)", body = AlternativesResponse),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
        (status = 503, description = "Record store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
pub(crate) async fn alternatives(
    State(state): State<AppState>,
    body: Result<Json<AlternativesRequest>, JsonRejection>,
) -> Result<Json<AlternativesResponse>, AppError> {
    let req = read_body(body)?;
    let alts = match req.same_type_as.as_deref() {
        Some(kind) => {
            state
                .checker
                .recommend_same_type(&req.crop, &req.market, &req.exclude_substance, kind)
                .await?
        }
        None => {
            state
                .checker
                .recommend(&req.crop, &req.market, &req.exclude_substance)
                .await?
        }
    };
    let alts = match req.limit {
        Some(limit) => alts.truncated(limit),
        None => alts,
    };

    Ok(Json(AlternativesResponse {
        count: alts.len(),
        candidates: alts.into_vec(),
    }))
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_validation_bounds() {
        let empty = BatchRequest {
            crop: "mango".into(),
            market: "EU".into(),
            items: vec![],
            as_of: None,
        };
        assert!(empty.check_limits().is_err());

        let one = BatchRequest {
            items: vec![BatchItemRequest {
                substance: "Azoxystrobin".into(),
                residue: None,
            }],
            ..empty
        };
        assert!(one.check_limits().is_ok());
    }

    #[test]
    fn alternatives_limit_bounds() {
        let req = |limit| AlternativesRequest {
            crop: "mango".into(),
            market: "EU".into(),
            exclude_substance: "Chlorpyrifos".into(),
            same_type_as: None,
            limit,
        };
        assert!(req(None).check_limits().is_ok());
        assert!(req(Some(5)).check_limits().is_ok());
        assert!(req(Some(0)).check_limits().is_err());
        assert!(req(Some(MAX_ALTERNATIVES + 1)).check_limits().is_err());
    }
}
