//! # gapwise-client: Result Submission Client
//!
//! Sends a completed [`AssessmentResult`](gapwise_report::AssessmentResult)
//! to the persistence service in a single `POST {base}/v1/results`.
//!
//! There is no retry and no idempotency key: submitting twice stores two
//! records. The caller keeps ownership of the result, so a failed
//! submission can be repeated by hand.

pub mod config;
pub mod error;
pub mod submission;

pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use submission::{SubmissionClient, SubmissionReceipt};
