//! # gapwise-api: HTTP Service for Compliance Gap Assessments
//!
//! Exposes the control catalog, the risk scoring function, interactive
//! assessment walker sessions, result persistence and the risk register
//! as a JSON API.
//!
//! ## API Surface
//!
//! | Prefix | Module | Concern |
//! |--------|--------|---------|
//! | `/v1/catalog` | [`routes::catalog`] | Loaded control catalog |
//! | `/v1/risk/score` | [`routes::risk`] | Risk score calculator |
//! | `/v1/assessments/*` | [`routes::assessments`] | Walker sessions |
//! | `/v1/results/*` | [`routes::results`] | Stored results |
//! | `/v1/risks/*` | [`routes::risks`] | Risk register |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Health checks and `/metrics` are mounted outside the auth middleware.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
pub use crate::state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let cors = cors_layer(state.config.cors_allow_origin.as_deref());

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::catalog::router())
        .merge(routes::risk::router())
        .merge(routes::assessments::router())
        .merge(routes::results::router())
        .merge(routes::risks::router())
        .merge(routes::audit::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated health checks and scrape endpoint.
    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(middleware::metrics::metrics_handler))
        .with_state(state);

    let router = Router::new().merge(ops).merge(api);
    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// `*` allows any origin; anything else must be a single valid origin.
fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return Some(layer.allow_origin(Any));
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => Some(layer.allow_origin(value)),
        Err(e) => {
            tracing::warn!(origin, error = %e, "ignoring invalid CORS_ALLOW_ORIGIN");
            None
        }
    }
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness check: returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
