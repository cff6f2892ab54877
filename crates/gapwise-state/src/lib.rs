//! # gapwise-state: Assessment Walker
//!
//! The state machine that drives one assessment run over a control
//! catalog. See [`walker`] for the transition rules.

pub mod walker;

pub use walker::{
    Advance, AssessmentWalker, CurrentControl, Progress, WalkState, WalkerError, SKIP_NOTE,
};
