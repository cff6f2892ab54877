//! Submission client errors.
//!
//! Transport failures, non-success responses and undecodable bodies are
//! distinct variants so callers can tell "never arrived" from "rejected".

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or no response arrived.
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("client configuration error: {0}")]
    Config(#[from] ConfigError),
}
