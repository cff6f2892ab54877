//! # Assessment Walker API
//!
//! One session per assessment run. Each transition (judge, skip, back)
//! runs under a single write lock of the session store, so concurrent
//! requests for the same session serialize and never observe a
//! half-applied move.
//!
//! Once the last control is judged the session is complete: the result is
//! available from `GET /v1/assessments/{id}/result` and every further
//! transition answers 409.
//!
//! Sessions are not kept forever: `DELETE /v1/assessments/{id}` discards
//! one, idle sessions are swept after the configured TTL, and new sessions
//! are refused with 503 while the store is at capacity.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use gapwise_core::{AssessmentId, AssessorId, ControlStatus, Impact, Likelihood, ProjectId};
use gapwise_report::AssessmentResult;
use gapwise_state::{Advance, AssessmentWalker, CurrentControl, WalkState, WalkerError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{check_len, extract_validated_json, Validate};
use crate::middleware::metrics::{ASSESSMENTS_COMPLETED_TOTAL, ASSESSMENTS_STARTED_TOTAL};
use crate::state::{AppState, AssessmentSession};

/// Maximum length of free-text judgement notes.
const MAX_NOTES_LEN: usize = 2000;

// -- Request / response types ---------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct StartAssessmentRequest {
    pub assessor_id: String,
    pub project_id: String,
}

impl Validate for StartAssessmentRequest {
    fn validate(&self) -> Result<(), String> {
        AssessorId::new(self.assessor_id.as_str()).map_err(|e| e.to_string())?;
        ProjectId::new(self.project_id.as_str()).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Judgement for the current control. `status`, `impact` and `likelihood`
/// are required; an unknown identifier is a 400.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JudgementRequest {
    #[schema(value_type = String, example = "partially-compliant")]
    pub status: ControlStatus,
    #[schema(value_type = String, example = "high")]
    pub impact: Impact,
    #[schema(value_type = String, example = "medium")]
    pub likelihood: Likelihood,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for JudgementRequest {
    fn validate(&self) -> Result<(), String> {
        match &self.notes {
            Some(notes) => check_len("notes", notes, MAX_NOTES_LEN),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ProgressView {
    pub judged: usize,
    pub total: usize,
    pub percent: u8,
}

/// Externally visible state of a session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub assessor_id: String,
    pub project_id: String,
    /// `"in-progress"` or `"complete"`.
    #[schema(value_type = String)]
    pub state: WalkState,
    /// The control awaiting judgement; absent once complete.
    #[schema(value_type = Option<Object>)]
    pub current: Option<CurrentControl>,
    pub progress: ProgressView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AssessmentSession> for SessionView {
    fn from(session: &AssessmentSession) -> Self {
        let progress = session.walker.progress();
        Self {
            id: *session.id.as_uuid(),
            assessor_id: session.assessor_id.to_string(),
            project_id: session.project_id.to_string(),
            state: session.walker.state(),
            current: session.walker.current(),
            progress: ProgressView {
                judged: progress.judged,
                total: progress.total,
                percent: progress.percent(),
            },
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BackResponse {
    /// `false` when already at the first control of the subdomain.
    pub moved: bool,
    pub session: SessionView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResultResponse {
    pub assessment_id: Uuid,
    #[schema(value_type = Object)]
    pub result: AssessmentResult,
}

// -- Router ---------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/assessments", post(start_assessment))
        .route(
            "/v1/assessments/{id}",
            get(get_assessment).delete(delete_assessment),
        )
        .route("/v1/assessments/{id}/judgements", post(submit_judgement))
        .route("/v1/assessments/{id}/skip", post(skip_control))
        .route("/v1/assessments/{id}/back", post(go_back))
        .route("/v1/assessments/{id}/result", get(get_assessment_result))
}

/// Run one walker transition under the store's write lock.
fn transition<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut AssessmentWalker) -> Result<R, WalkerError>,
) -> Result<(R, SessionView), AppError> {
    state
        .sessions
        .try_update(&id, |session| {
            let out = f(&mut session.walker)?;
            session.updated_at = Utc::now();
            Ok::<_, WalkerError>((out, SessionView::from(&*session)))
        })
        .ok_or_else(|| AppError::NotFound(format!("assessment {id} not found")))?
        .map_err(AppError::from)
}

fn count_completion(id: Uuid, advance: &Advance) {
    if matches!(advance, Advance::Complete) {
        metrics::counter!(ASSESSMENTS_COMPLETED_TOTAL).increment(1);
        tracing::info!(assessment_id = %id, "assessment session complete");
    }
}

// -- Handlers -------------------------------------------------------------------

/// POST /v1/assessments: Start a walk at the first control.
#[utoipa::path(
    post,
    path = "/v1/assessments",
    request_body = StartAssessmentRequest,
    responses(
        (status = 201, description = "Session started", body = SessionView),
        (status = 422, description = "Invalid identifiers", body = crate::error::ErrorBody),
        (status = 503, description = "Session limit reached", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn start_assessment(
    State(state): State<AppState>,
    body: Result<Json<StartAssessmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let req = extract_validated_json(body)?;
    let now = Utc::now();
    if state.sessions.len() >= state.config.max_sessions {
        state.evict_idle_sessions(now);
    }
    if state.sessions.len() >= state.config.max_sessions {
        tracing::warn!(
            max_sessions = state.config.max_sessions,
            "refusing new assessment session"
        );
        return Err(AppError::ServiceUnavailable(
            "assessment session limit reached".to_string(),
        ));
    }
    let session = AssessmentSession {
        id: AssessmentId::new(),
        assessor_id: AssessorId::new(req.assessor_id)?,
        project_id: ProjectId::new(req.project_id)?,
        walker: AssessmentWalker::new(state.catalog.clone()),
        created_at: now,
        updated_at: now,
    };
    let view = SessionView::from(&session);
    state.sessions.insert(*session.id.as_uuid(), session);

    metrics::counter!(ASSESSMENTS_STARTED_TOTAL).increment(1);
    tracing::info!(
        assessment_id = %view.id,
        project_id = %view.project_id,
        total_controls = view.progress.total,
        "assessment session started"
    );

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/assessments/{id}: Current control and progress.
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Session found", body = SessionView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .get(&id)
        .map(|session| Json(SessionView::from(&session)))
        .ok_or_else(|| AppError::NotFound(format!("assessment {id} not found")))
}

/// DELETE /v1/assessments/{id}: Discard a session.
#[utoipa::path(
    delete,
    path = "/v1/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn delete_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("assessment {id} not found")))?;
    tracing::info!(assessment_id = %id, "assessment session discarded");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/assessments/{id}/judgements: Judge the current control.
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/judgements",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    request_body = JudgementRequest,
    responses(
        (status = 200, description = "Judgement recorded", body = SessionView),
        (status = 400, description = "Missing or unknown rating", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Assessment already complete", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn submit_judgement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<JudgementRequest>, JsonRejection>,
) -> Result<Json<SessionView>, AppError> {
    let req = extract_validated_json(body)?;
    let (advance, view) = transition(&state, id, |walker| {
        walker.submit(req.status, req.impact, req.likelihood, req.notes)
    })?;
    count_completion(id, &advance);
    Ok(Json(view))
}

/// POST /v1/assessments/{id}/skip: Defer the current control.
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/skip",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Control skipped", body = SessionView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Assessment already complete", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn skip_control(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let (advance, view) = transition(&state, id, AssessmentWalker::skip)?;
    count_completion(id, &advance);
    Ok(Json(view))
}

/// POST /v1/assessments/{id}/back: Previous control in the subdomain.
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/back",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Navigation outcome", body = BackResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Assessment already complete", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BackResponse>, AppError> {
    let (moved, session) = transition(&state, id, AssessmentWalker::go_back)?;
    Ok(Json(BackResponse { moved, session }))
}

/// GET /v1/assessments/{id}/result: The aggregated result.
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/result",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Assessment result", body = AssessmentResultResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Assessment still in progress", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn get_assessment_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentResultResponse>, AppError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("assessment {id} not found")))?;
    let result = session
        .walker
        .result()
        .cloned()
        .ok_or_else(|| AppError::Conflict(format!("assessment {id} is still in progress")))?;
    Ok(Json(AssessmentResultResponse {
        assessment_id: id,
        result,
    }))
}
