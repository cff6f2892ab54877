//! # Error Types
//!
//! Validation errors for the foundational types. Derived with `thiserror`.
//!
//! Parsing errors carry the rejected input verbatim so that callers can
//! echo it back in validation responses.

use thiserror::Error;

/// Rejection of a primitive value at construction or parse time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Domain name is not one of the five framework domains.
    #[error("unknown domain: {0:?}")]
    UnknownDomain(String),

    /// Status identifier is not a known control status.
    #[error("unknown control status: {0:?} (expected compliant, partially-compliant, non-compliant or not-assessed)")]
    UnknownStatus(String),

    /// Impact identifier is not a known impact rating.
    #[error("unknown impact: {0:?} (expected critical, high, medium or low)")]
    UnknownImpact(String),

    /// Likelihood identifier is not a known likelihood rating.
    #[error("unknown likelihood: {0:?} (expected very-high, high, medium, low or very-low)")]
    UnknownLikelihood(String),

    /// A required identifier was empty or whitespace only.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// An identifier exceeded its maximum length.
    #[error("{field} must not exceed {max} characters (got {actual})")]
    TooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
        /// Length of the rejected value.
        actual: usize,
    },
}
