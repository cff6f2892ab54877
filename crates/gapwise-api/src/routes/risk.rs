//! # Risk Score Calculator
//!
//! Stateless scoring of one control judgement. Inputs are plain strings
//! and unknown values fall back to the scoring defaults, so this endpoint
//! only rejects malformed or oversized bodies.

use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use gapwise_risk::{score_lenient, HIGH_RISK_THRESHOLD};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{check_len, extract_validated_json, Validate};
use crate::state::AppState;

const MAX_FIELD_LEN: usize = 255;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreRequest {
    /// e.g. `"partially-compliant"`.
    pub status: String,
    /// e.g. `"high"`.
    pub impact: String,
    /// e.g. `"very-low"`.
    pub likelihood: String,
    /// Domain display name, e.g. `"Cybersecurity Defence"`.
    pub domain: String,
}

impl Validate for ScoreRequest {
    fn validate(&self) -> Result<(), String> {
        check_len("status", &self.status, MAX_FIELD_LEN)?;
        check_len("impact", &self.impact, MAX_FIELD_LEN)?;
        check_len("likelihood", &self.likelihood, MAX_FIELD_LEN)?;
        check_len("domain", &self.domain, MAX_FIELD_LEN)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    /// Severity in `[0, 10]`, one decimal place.
    pub risk_score: f64,
    /// Whether the score reaches the high-risk threshold (7).
    pub high_risk: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/risk/score", post(calculate_score))
}

/// POST /v1/risk/score: Score one judgement.
#[utoipa::path(
    post,
    path = "/v1/risk/score",
    request_body = ScoreRequest,
    responses(
        (status = 200, description = "Risk score", body = ScoreResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Field too long", body = crate::error::ErrorBody),
    ),
    tag = "risk"
)]
pub(crate) async fn calculate_score(
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let risk_score = score_lenient(&req.status, &req.impact, &req.likelihood, &req.domain);
    Ok(Json(ScoreResponse {
        risk_score,
        high_risk: risk_score >= HIGH_RISK_THRESHOLD,
    }))
}
