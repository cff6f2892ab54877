//! # gapwise-report: Result Aggregation
//!
//! Turns the ordered judgements of a finished assessment into an
//! [`AssessmentResult`]: per-domain compliance scores, the overall score,
//! high-risk controls and a list of recommendations.
//!
//! ## Key Design Principles
//!
//! - **Pure.** [`aggregate`] reads nothing but its input and cannot fail.
//!   Aggregating the same judgements twice yields equal results.
//!
//! - **No zero fill.** A domain without judgements is absent from
//!   [`DomainScores`]; it does not count as 0% in the overall mean.
//!
//! - **Order preserving.** Domain scores are keyed in first-judged order
//!   and control assessments keep traversal order.
//!
//! - **Checkable.** [`verify`] re-derives a result received from outside
//!   and rejects it unless every derived field matches.
//!
//! ## Crate Policy
//!
//! - No `unwrap()` or `expect()` outside tests.

pub mod aggregate;
pub mod recommend;
pub mod result;
pub mod verify;

pub use aggregate::aggregate;
pub use result::{AssessmentResult, DomainScores};
pub use verify::{verify, ResultError};
