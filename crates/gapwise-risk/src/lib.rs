//! # gapwise-risk: Risk Scoring
//!
//! Two independent risk models live here:
//!
//! - [`score`]: the per-control severity used by assessments. A weighted
//!   product of impact, likelihood, compliance status and domain, rounded
//!   to one decimal and capped at 10.
//!
//! - [`register`]: the standalone risk register, where each entry's score
//!   is a plain `impact × likelihood` product on 1–5 scales.
//!
//! ## Key Design Principles
//!
//! - **Pure scoring.** [`score::score`] has no side effects and cannot
//!   fail. The typed entry point takes exhaustive enums; the lenient entry
//!   point takes raw strings and falls back to documented defaults.
//!
//! - **Weights in one place.** Every weight table is a `match` in
//!   [`weights`], so adding an enum variant fails to compile until it is
//!   weighted.
//!
//! ## Crate Policy
//!
//! - Depends only on `gapwise-core` internally.
//! - No `unwrap()` or `expect()` outside tests.

pub mod register;
pub mod score;
pub mod weights;

pub use register::{NewRisk, RegisterError, RiskEntry, RiskFilter, RiskLevel, RiskStatus, RiskUpdate};
pub use score::{score, score_lenient, HIGH_RISK_THRESHOLD, MAX_RISK_SCORE};
