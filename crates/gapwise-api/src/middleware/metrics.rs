//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency) are recorded in middleware
//! through the `metrics` facade. Domain counters (assessments started and
//! completed, results submitted) are incremented by the handlers. The
//! recorder is installed in `main`; `/metrics` renders it.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

pub const HTTP_REQUESTS_TOTAL: &str = "gapwise_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "gapwise_http_request_duration_seconds";
pub const ASSESSMENTS_STARTED_TOTAL: &str = "gapwise_assessments_started_total";
pub const ASSESSMENTS_COMPLETED_TOTAL: &str = "gapwise_assessments_completed_total";
pub const RESULTS_SUBMITTED_TOTAL: &str = "gapwise_results_submitted_total";

/// Record request count and latency, labelled by the matched route
/// template so path parameters do not explode label cardinality.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// GET /metrics: Prometheus text exposition.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("metrics recorder not installed".into()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}
