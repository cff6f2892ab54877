//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gapwise API",
        version = "0.1.0",
        description = "Compliance gap assessment: control catalog, risk scoring, assessment walker sessions, result persistence, the risk register and audit verification.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Catalog
        crate::routes::catalog::get_catalog,
        // Risk scoring
        crate::routes::risk::calculate_score,
        // Assessments
        crate::routes::assessments::start_assessment,
        crate::routes::assessments::get_assessment,
        crate::routes::assessments::delete_assessment,
        crate::routes::assessments::submit_judgement,
        crate::routes::assessments::skip_control,
        crate::routes::assessments::go_back,
        crate::routes::assessments::get_assessment_result,
        // Results
        crate::routes::results::submit_result,
        crate::routes::results::list_results,
        crate::routes::results::get_submission,
        // Risk register
        crate::routes::risks::list_risks,
        crate::routes::risks::create_risk,
        crate::routes::risks::get_risk,
        crate::routes::risks::update_risk,
        crate::routes::risks::delete_risk,
        // Audit
        crate::routes::audit::verify_audit_chain,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::state::SubmissionRecord,
        crate::routes::catalog::CatalogView,
        crate::routes::risk::ScoreRequest,
        crate::routes::risk::ScoreResponse,
        crate::routes::assessments::StartAssessmentRequest,
        crate::routes::assessments::JudgementRequest,
        crate::routes::assessments::ProgressView,
        crate::routes::assessments::SessionView,
        crate::routes::assessments::BackResponse,
        crate::routes::assessments::AssessmentResultResponse,
        crate::routes::results::SubmitResultRequest,
        crate::routes::risks::CreateRiskRequest,
        crate::routes::risks::UpdateRiskRequest,
        crate::routes::risks::RiskResponse,
        crate::db::audit::ChainReport,
    )),
    tags(
        (name = "catalog", description = "Control catalog"),
        (name = "risk", description = "Risk score calculator"),
        (name = "assessments", description = "Assessment walker sessions"),
        (name = "results", description = "Stored assessment results"),
        (name = "risks", description = "Risk register"),
        (name = "audit", description = "Audit log verification"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
