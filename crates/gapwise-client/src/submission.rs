//! Result submission.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/v1/results` | Store an assessment result |

use std::time::Duration;

use chrono::{DateTime, Utc};
use gapwise_core::{AssessorId, ProjectId};
use gapwise_report::AssessmentResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{ClientConfig, ConfigError};
use crate::error::ClientError;

const RESULTS_ENDPOINT: &str = "POST /v1/results";

#[derive(Debug, Serialize)]
struct SubmitResultRequest<'a> {
    assessor_id: &'a AssessorId,
    project_id: &'a ProjectId,
    result: &'a AssessmentResult,
}

/// What the service returns for a stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub assessor_id: String,
    pub project_id: String,
    pub result_digest: String,
    pub submitted_at: DateTime<Utc>,
}

/// Client for the persistence service.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl SubmissionClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the token is not a valid header
    /// value, or [`ClientError::Http`] if the HTTP stack fails to start.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ConfigError::InvalidToken)?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Submit a result once. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] on transport failure,
    /// [`ClientError::Api`] on a non-2xx status and
    /// [`ClientError::Deserialization`] if the receipt cannot be decoded.
    pub async fn submit(
        &self,
        assessor_id: &AssessorId,
        project_id: &ProjectId,
        result: &AssessmentResult,
    ) -> Result<SubmissionReceipt, ClientError> {
        let url = format!(
            "{}/v1/results",
            self.base_url.as_str().trim_end_matches('/')
        );
        let body = SubmitResultRequest {
            assessor_id,
            project_id,
            result,
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: RESULTS_ENDPOINT.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "result submission rejected");
            return Err(ClientError::Api {
                endpoint: RESULTS_ENDPOINT.into(),
                status,
                body,
            });
        }

        let receipt: SubmissionReceipt =
            resp.json().await.map_err(|e| ClientError::Deserialization {
                endpoint: RESULTS_ENDPOINT.into(),
                source: e,
            })?;
        tracing::info!(id = %receipt.id, digest = %receipt.result_digest, "result submitted");
        Ok(receipt)
    }
}
