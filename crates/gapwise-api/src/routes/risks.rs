//! # Risk Register API
//!
//! CRUD over organisation-level risks. Score (`impact × likelihood`) and
//! level are derived on every write and cannot be set by clients.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use gapwise_risk::{NewRisk, RiskEntry, RiskFilter, RiskLevel, RiskStatus, RiskUpdate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::audit::{self, AuditEvent};
use crate::error::AppError;
use crate::extractors::{check_len, extract_validated_json, Validate};
use crate::state::AppState;

const MAX_TEXT_LEN: usize = 4000;

// -- DTOs -----------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRiskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    /// 1–5.
    pub impact: u8,
    /// 1–5.
    pub likelihood: u8,
    /// `open` (default), `mitigating`, `accepted` or `closed`.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<RiskStatus>,
    #[serde(default)]
    pub mitigation: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRiskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub impact: Option<u8>,
    #[serde(default)]
    pub likelihood: Option<u8>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<RiskStatus>,
    #[serde(default)]
    pub mitigation: Option<String>,
}

fn check_free_text(fields: &[(&str, &Option<String>)]) -> Result<(), String> {
    for (name, value) in fields {
        if let Some(value) = value {
            check_len(name, value, MAX_TEXT_LEN)?;
        }
    }
    Ok(())
}

impl Validate for CreateRiskRequest {
    fn validate(&self) -> Result<(), String> {
        check_free_text(&[
            ("description", &self.description),
            ("category", &self.category),
            ("owner", &self.owner),
            ("mitigation", &self.mitigation),
        ])
    }
}

impl Validate for UpdateRiskRequest {
    fn validate(&self) -> Result<(), String> {
        check_free_text(&[
            ("description", &self.description),
            ("category", &self.category),
            ("owner", &self.owner),
            ("mitigation", &self.mitigation),
        ])
    }
}

impl From<CreateRiskRequest> for NewRisk {
    fn from(req: CreateRiskRequest) -> Self {
        NewRisk {
            title: req.title,
            description: req.description,
            category: req.category,
            owner: req.owner,
            impact: req.impact,
            likelihood: req.likelihood,
            status: req.status.unwrap_or_default(),
            mitigation: req.mitigation,
        }
    }
}

impl From<UpdateRiskRequest> for RiskUpdate {
    fn from(req: UpdateRiskRequest) -> Self {
        RiskUpdate {
            title: req.title,
            description: req.description,
            category: req.category,
            owner: req.owner,
            impact: req.impact,
            likelihood: req.likelihood,
            status: req.status,
            mitigation: req.mitigation,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RiskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub impact: u8,
    pub likelihood: u8,
    /// `impact × likelihood`, 1–25.
    pub score: u8,
    #[schema(value_type = String)]
    pub level: RiskLevel,
    #[schema(value_type = String)]
    pub status: RiskStatus,
    pub mitigation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RiskEntry> for RiskResponse {
    fn from(e: RiskEntry) -> Self {
        Self {
            id: e.id,
            title: e.title,
            description: e.description,
            category: e.category,
            owner: e.owner,
            impact: e.impact,
            likelihood: e.likelihood,
            score: e.score,
            level: e.level,
            status: e.status,
            mitigation: e.mitigation,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRisksQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by level.
    pub level: Option<String>,
}

impl ListRisksQuery {
    fn filter(&self) -> Result<RiskFilter, AppError> {
        Ok(RiskFilter {
            status: self.status.as_deref().map(str::parse).transpose()?,
            level: self.level.as_deref().map(str::parse).transpose()?,
        })
    }
}

fn risk_event(entry: &RiskEntry, action: &str) -> AuditEvent {
    AuditEvent {
        event_type: format!("risk.{action}"),
        actor: entry.owner.clone(),
        resource_type: "risk".to_string(),
        resource_id: entry.id,
        action: action.to_string(),
        metadata: serde_json::json!({
            "score": entry.score,
            "level": entry.level.as_str(),
            "status": entry.status.as_str(),
        }),
    }
}

// -- Router ---------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/risks", get(list_risks).post(create_risk))
        .route(
            "/v1/risks/{id}",
            get(get_risk).put(update_risk).delete(delete_risk),
        )
}

// -- Handlers -------------------------------------------------------------------

/// GET /v1/risks: Register entries, highest score first.
#[utoipa::path(
    get,
    path = "/v1/risks",
    params(ListRisksQuery),
    responses(
        (status = 200, description = "Register entries", body = Vec<RiskResponse>),
        (status = 422, description = "Unknown filter value", body = crate::error::ErrorBody),
    ),
    tag = "risks"
)]
pub(crate) async fn list_risks(
    State(state): State<AppState>,
    Query(query): Query<ListRisksQuery>,
) -> Result<Json<Vec<RiskResponse>>, AppError> {
    let filter = query.filter()?;
    let entries = filter.apply(state.risks.list());
    Ok(Json(entries.into_iter().map(RiskResponse::from).collect()))
}

/// POST /v1/risks: Add a register entry.
#[utoipa::path(
    post,
    path = "/v1/risks",
    request_body = CreateRiskRequest,
    responses(
        (status = 201, description = "Entry created", body = RiskResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "risks"
)]
pub(crate) async fn create_risk(
    State(state): State<AppState>,
    body: Result<Json<CreateRiskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RiskResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let entry = RiskEntry::create(req.into())?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::risks::insert(pool, &entry).await {
            tracing::error!(risk_id = %entry.id, error = %e, "failed to persist risk");
            return Err(AppError::Internal("risk could not be persisted".to_string()));
        }
    }
    state.risks.insert(entry.id, entry.clone());
    audit::record(state.db_pool.as_ref(), risk_event(&entry, "created")).await;

    tracing::info!(risk_id = %entry.id, score = entry.score, level = %entry.level, "risk created");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /v1/risks/{id}: One register entry.
#[utoipa::path(
    get,
    path = "/v1/risks/{id}",
    params(("id" = Uuid, Path, description = "Risk ID")),
    responses(
        (status = 200, description = "Entry found", body = RiskResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "risks"
)]
pub(crate) async fn get_risk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RiskResponse>, AppError> {
    state
        .risks
        .get(&id)
        .map(|entry| Json(entry.into()))
        .ok_or_else(|| AppError::NotFound(format!("risk {id} not found")))
}

/// PUT /v1/risks/{id}: Partial update; score and level are recomputed.
#[utoipa::path(
    put,
    path = "/v1/risks/{id}",
    params(("id" = Uuid, Path, description = "Risk ID")),
    request_body = UpdateRiskRequest,
    responses(
        (status = 200, description = "Entry updated", body = RiskResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "risks"
)]
pub(crate) async fn update_risk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateRiskRequest>, JsonRejection>,
) -> Result<Json<RiskResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let update: RiskUpdate = req.into();

    // Applied to a copy; the store is only written after the database.
    let mut entry = state
        .risks
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("risk {id} not found")))?;
    entry.apply(update)?;

    if let Some(pool) = &state.db_pool {
        match crate::db::risks::update(pool, &entry).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(risk_id = %id, "risk missing from database on update; inserting");
                if let Err(e) = crate::db::risks::insert(pool, &entry).await {
                    tracing::error!(risk_id = %id, error = %e, "failed to persist risk");
                    return Err(AppError::Internal("risk could not be persisted".to_string()));
                }
            }
            Err(e) => {
                tracing::error!(risk_id = %id, error = %e, "failed to update risk");
                return Err(AppError::Internal("risk could not be persisted".to_string()));
            }
        }
    }

    state.risks.insert(id, entry.clone());
    audit::record(state.db_pool.as_ref(), risk_event(&entry, "updated")).await;

    Ok(Json(entry.into()))
}

/// DELETE /v1/risks/{id}: Remove a register entry.
#[utoipa::path(
    delete,
    path = "/v1/risks/{id}",
    params(("id" = Uuid, Path, description = "Risk ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "risks"
)]
pub(crate) async fn delete_risk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let entry = state
        .risks
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("risk {id} not found")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::risks::delete(pool, id).await {
            tracing::error!(risk_id = %id, error = %e, "failed to delete risk");
            return Err(AppError::Internal("risk could not be deleted".to_string()));
        }
    }
    state.risks.remove(&id);
    audit::record(state.db_pool.as_ref(), risk_event(&entry, "deleted")).await;

    tracing::info!(risk_id = %id, "risk deleted");
    Ok(StatusCode::NO_CONTENT)
}
