//! # Audit Log Verification
//!
//! Recomputes the audit hash chain and reports broken links and altered
//! rows. The audit log lives in PostgreSQL only, so this endpoint returns
//! 503 when the service runs without a database.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::audit::{self, ChainReport};
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_VERIFY_LIMIT: i64 = 10_000;
const MAX_VERIFY_LIMIT: i64 = 1_000_000;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery {
    /// Number of events to check, oldest first. Defaults to 10000.
    pub limit: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/audit/verify", get(verify_audit_chain))
}

/// GET /v1/audit/verify: Check the audit hash chain.
#[utoipa::path(
    get,
    path = "/v1/audit/verify",
    params(VerifyQuery),
    responses(
        (status = 200, description = "Chain report", body = ChainReport),
        (status = 422, description = "Limit out of range", body = crate::error::ErrorBody),
        (status = 503, description = "No database configured", body = crate::error::ErrorBody),
    ),
    tag = "audit"
)]
pub(crate) async fn verify_audit_chain(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<ChainReport>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_VERIFY_LIMIT);
    if !(1..=MAX_VERIFY_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_VERIFY_LIMIT}"
        )));
    }
    let pool = state
        .db_pool
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("audit log requires a database".into()))?;

    let report = audit::verify_chain(pool, limit)
        .await
        .map_err(|e| AppError::Internal(format!("audit chain verification failed: {e}")))?;
    if !report.chain_valid {
        tracing::warn!(
            broken_links = report.broken_links,
            altered_events = report.altered_events,
            first_fault = ?report.first_fault,
            "audit chain verification failed"
        );
    }
    Ok(Json(report))
}
