//! # Bearer Token Authentication
//!
//! A single static token guards `/v1/*` when `AUTH_TOKEN` is configured.
//! The `Authorization: Bearer <token>` header is decoded as a typed header
//! and compared in constant time.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{ErrorBody, ErrorDetail};

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<Zeroizing<String>>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time token comparison. A length mismatch still performs a
/// comparison so timing does not depend on where the inputs differ.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Reject requests without a valid bearer token. Pass everything through
/// when no token is configured.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let Some(expected) = expected else {
        return next.run(request).await;
    };

    match request.headers().typed_get::<Authorization<Bearer>>() {
        Some(Authorization(bearer)) if constant_time_token_eq(bearer.token(), &expected) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::warn!("authentication failed: invalid bearer token");
            unauthorized_response("invalid bearer token")
        }
        None if request.headers().contains_key(header::AUTHORIZATION) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_app(token: Option<&str>) -> Router {
        let auth_config = AuthConfig {
            token: token.map(|t| Zeroizing::new(t.to_string())),
        };
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    async fn status_for(app: Router, auth: Option<&str>) -> StatusCode {
        let mut builder = axum::http::Request::builder().uri("/test");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn valid_token_accepted() {
        let status = status_for(test_app(Some("s3cret")), Some("Bearer s3cret")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_token_rejected() {
        let status = status_for(test_app(Some("s3cret")), Some("Bearer nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_header_rejected() {
        let status = status_for(test_app(Some("s3cret")), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn basic_scheme_rejected() {
        let status = status_for(test_app(Some("s3cret")), Some("Basic czNjcmV0")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_disabled_allows_all() {
        let status = status_for(test_app(None), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn constant_time_eq_behaviour() {
        assert!(constant_time_token_eq("abc", "abc"));
        assert!(!constant_time_token_eq("abc", "abd"));
        assert!(!constant_time_token_eq("ab", "abc"));
    }
}
