//! # Result Persistence API
//!
//! Receives finished assessment results. Every POST creates a new record;
//! there is no idempotency key, so a repeated submission is stored twice.
//! A result whose derived fields do not follow from its judgements is
//! rejected with 422.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use gapwise_core::{AssessorId, ProjectId};
use gapwise_report::AssessmentResult;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::audit::{self, AuditEvent};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::middleware::metrics::RESULTS_SUBMITTED_TOTAL;
use crate::state::{AppState, SubmissionRecord};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitResultRequest {
    pub assessor_id: String,
    pub project_id: String,
    #[schema(value_type = Object)]
    pub result: AssessmentResult,
}

impl Validate for SubmitResultRequest {
    fn validate(&self) -> Result<(), String> {
        AssessorId::new(self.assessor_id.as_str()).map_err(|e| e.to_string())?;
        ProjectId::new(self.project_id.as_str()).map_err(|e| e.to_string())?;
        gapwise_report::verify(&self.result).map_err(|e| format!("result: {e}"))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListResultsQuery {
    /// Only results for this project.
    pub project_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/results", get(list_results).post(submit_result))
        .route("/v1/results/{id}", get(get_submission))
}

/// POST /v1/results: Store an assessment result.
#[utoipa::path(
    post,
    path = "/v1/results",
    request_body = SubmitResultRequest,
    responses(
        (status = 201, description = "Result stored", body = SubmissionRecord),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid identifiers or inconsistent result", body = crate::error::ErrorBody),
    ),
    tag = "results"
)]
pub(crate) async fn submit_result(
    State(state): State<AppState>,
    body: Result<Json<SubmitResultRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionRecord>), AppError> {
    let req = extract_validated_json(body)?;
    let result_digest = req
        .result
        .digest()
        .map_err(|e| AppError::Internal(format!("failed to digest result: {e}")))?;

    let record = SubmissionRecord {
        id: Uuid::new_v4(),
        assessor_id: AssessorId::new(req.assessor_id)?,
        project_id: ProjectId::new(req.project_id)?,
        result: req.result,
        result_digest,
        submitted_at: Utc::now(),
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::submissions::insert(pool, &record).await {
            tracing::error!(submission_id = %record.id, error = %e, "failed to persist submission");
            return Err(AppError::Internal(
                "submission could not be persisted".to_string(),
            ));
        }
    }
    state.submissions.insert(record.id, record.clone());

    audit::record(
        state.db_pool.as_ref(),
        AuditEvent {
            event_type: "result.submitted".to_string(),
            actor: Some(record.assessor_id.to_string()),
            resource_type: "submission".to_string(),
            resource_id: record.id,
            action: "create".to_string(),
            metadata: serde_json::json!({
                "project_id": record.project_id.as_str(),
                "result_digest": record.result_digest,
                "overall_score": record.result.overall_score,
            }),
        },
    )
    .await;

    metrics::counter!(RESULTS_SUBMITTED_TOTAL).increment(1);
    tracing::info!(
        submission_id = %record.id,
        project_id = %record.project_id,
        digest = %record.result_digest,
        "assessment result stored"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/results: Stored results, oldest first.
#[utoipa::path(
    get,
    path = "/v1/results",
    params(ListResultsQuery),
    responses(
        (status = 200, description = "Stored results", body = Vec<SubmissionRecord>),
    ),
    tag = "results"
)]
pub(crate) async fn list_results(
    State(state): State<AppState>,
    Query(query): Query<ListResultsQuery>,
) -> Json<Vec<SubmissionRecord>> {
    let mut records: Vec<SubmissionRecord> = state
        .submissions
        .list()
        .into_iter()
        .filter(|r| {
            query
                .project_id
                .as_deref()
                .map_or(true, |p| r.project_id.as_str() == p)
        })
        .collect();
    records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
    Json(records)
}

/// GET /v1/results/{id}: One stored result.
#[utoipa::path(
    get,
    path = "/v1/results/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Stored result", body = SubmissionRecord),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "results"
)]
pub(crate) async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionRecord>, AppError> {
    if let Some(record) = state.submissions.get(&id) {
        return Ok(Json(record));
    }
    if let Some(pool) = &state.db_pool {
        let record = crate::db::submissions::get_by_id(pool, id)
            .await
            .map_err(|e| AppError::Internal(format!("failed to load submission: {e}")))?;
        if let Some(record) = record {
            state.submissions.insert(record.id, record.clone());
            return Ok(Json(record));
        }
    }
    Err(AppError::NotFound(format!("result {id} not found")))
}
