//! # gapwise-core: Foundational Types
//!
//! The leaf of the Gapwise dependency graph. Defines the type-system
//! primitives every other crate agrees on: the five control-framework
//! domains, the three judgement ratings, the composite control key, the
//! judgement record, identifier newtypes, and the error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **One `Domain` enum.** Five variants, exhaustive `match` everywhere.
//!    Catalog files, weight tables and report keys all resolve to it.
//!
//! 2. **Ratings are tagged unions.** `ControlStatus`, `Impact` and
//!    `Likelihood` parse with `FromStr` against exact identifiers. No
//!    substring matching.
//!
//! 3. **Validated identifiers.** `AssessorId` and `ProjectId` reject blank
//!    and oversized values at construction.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `gapwise-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod domain;
pub mod error;
pub mod identity;
pub mod judgement;
pub mod key;
pub mod rating;

pub use domain::{Domain, DOMAIN_COUNT};
pub use error::ValidationError;
pub use identity::{AssessmentId, AssessorId, ProjectId};
pub use judgement::ControlJudgement;
pub use key::ControlKey;
pub use rating::{ControlStatus, Impact, Likelihood};
