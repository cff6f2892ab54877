//! # Control Catalog API
//!
//! Read-only view of the catalog loaded at startup.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use gapwise_catalog::DomainSection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// The loaded catalog with its control count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogView {
    pub framework: String,
    pub total_controls: usize,
    /// Domains in traversal order, each with ordered subdomains and controls.
    #[schema(value_type = Vec<Object>)]
    pub domains: Vec<DomainSection>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/catalog", get(get_catalog))
}

/// GET /v1/catalog: The control catalog in traversal order.
#[utoipa::path(
    get,
    path = "/v1/catalog",
    responses(
        (status = 200, description = "Loaded control catalog", body = CatalogView),
    ),
    tag = "catalog"
)]
pub(crate) async fn get_catalog(State(state): State<AppState>) -> Json<CatalogView> {
    Json(CatalogView {
        framework: state.catalog.framework().to_string(),
        total_controls: state.catalog.total_controls(),
        domains: state.catalog.domains().to_vec(),
    })
}
