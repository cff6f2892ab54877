//! # Assessment Walker
//!
//! ```text
//! InProgress ──submit/skip──▶ InProgress (next control)
//!     │  ▲
//!     │  └── go_back (same subdomain, index > 0)
//!     │
//!     └──submit/skip on last control──▶ Complete (terminal)
//! ```
//!
//! The cursor is `(domain_index, subdomain_index, control_index)` into the
//! catalog. After each judgement it advances to the next control in the
//! subdomain, else the first control of the next subdomain, else the first
//! control of the next domain, else the walk completes and the judgements
//! are aggregated.
//!
//! Judgements live in an arena (`Vec`) indexed by [`ControlKey`].
//! Re-judging a control after `go_back` replaces the entry in place, so
//! `control_assessments` keeps first-judged order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use gapwise_catalog::ControlCatalog;
use gapwise_core::{ControlJudgement, ControlKey, ControlStatus, Domain, Impact, Likelihood};
use gapwise_report::{aggregate, AssessmentResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Note attached to skipped controls.
pub const SKIP_NOTE: &str = "Skipped for later review";

// ─── State ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkState {
    InProgress,
    Complete,
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("in-progress"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkerError {
    /// Every control has been judged; the walk accepts no more input.
    #[error("assessment is already complete")]
    AlreadyComplete,
}

// ─── Views ───────────────────────────────────────────────────────────

/// The control currently presented to the assessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentControl {
    pub domain: Domain,
    pub subdomain: String,
    pub control: String,
    pub domain_index: usize,
    pub subdomain_index: usize,
    pub control_index: usize,
    /// Number of controls in the current subdomain.
    pub subdomain_size: usize,
}

impl CurrentControl {
    pub fn key(&self) -> ControlKey {
        ControlKey::new(self.domain, self.subdomain.clone(), self.control.clone())
    }
}

/// Judged controls against catalog size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub judged: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage, 0–100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.judged * 100) / self.total) as u8
    }
}

/// Outcome of a judgement.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The walk moved on to this control.
    Next(CurrentControl),
    /// The last control was judged. The result is available from
    /// [`AssessmentWalker::result`].
    Complete,
}

// ─── Walker ──────────────────────────────────────────────────────────

/// One assessment run over a catalog.
#[derive(Debug, Clone)]
pub struct AssessmentWalker {
    catalog: Arc<ControlCatalog>,
    domain_index: usize,
    subdomain_index: usize,
    control_index: usize,
    judgements: Vec<ControlJudgement>,
    slots: HashMap<ControlKey, usize>,
    result: Option<AssessmentResult>,
}

impl AssessmentWalker {
    /// Start a walk at the first control of the first domain.
    pub fn new(catalog: Arc<ControlCatalog>) -> Self {
        Self {
            catalog,
            domain_index: 0,
            subdomain_index: 0,
            control_index: 0,
            judgements: Vec::new(),
            slots: HashMap::new(),
            result: None,
        }
    }

    pub fn catalog(&self) -> &ControlCatalog {
        &self.catalog
    }

    pub fn state(&self) -> WalkState {
        if self.result.is_some() {
            WalkState::Complete
        } else {
            WalkState::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// The control awaiting judgement, or `None` once complete.
    pub fn current(&self) -> Option<CurrentControl> {
        if self.is_complete() {
            return None;
        }
        let entry =
            self.catalog
                .entry_at(self.domain_index, self.subdomain_index, self.control_index)?;
        let subdomain_size = self
            .catalog
            .controls(entry.domain, entry.subdomain)
            .len();
        Some(CurrentControl {
            domain: entry.domain,
            subdomain: entry.subdomain.to_string(),
            control: entry.control.to_string(),
            domain_index: entry.domain_index,
            subdomain_index: entry.subdomain_index,
            control_index: entry.control_index,
            subdomain_size,
        })
    }

    pub fn progress(&self) -> Progress {
        Progress {
            judged: self.judgements.len(),
            total: self.catalog.total_controls(),
        }
    }

    /// Judgements recorded so far, in first-judged order.
    pub fn judgements(&self) -> &[ControlJudgement] {
        &self.judgements
    }

    /// The aggregated result once the walk is complete.
    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    /// Record a judgement for the current control and advance.
    ///
    /// # Errors
    ///
    /// Returns [`WalkerError::AlreadyComplete`] after the last control.
    pub fn submit(
        &mut self,
        status: ControlStatus,
        impact: Impact,
        likelihood: Likelihood,
        notes: Option<String>,
    ) -> Result<Advance, WalkerError> {
        let current = self.current().ok_or(WalkerError::AlreadyComplete)?;
        let risk_score = gapwise_risk::score(status, impact, likelihood, current.domain);
        let judgement = ControlJudgement {
            domain: current.domain,
            subdomain: current.subdomain,
            control: current.control,
            status,
            impact,
            likelihood,
            risk_score,
            notes,
        };
        self.record(judgement);
        Ok(self.advance())
    }

    /// Defer the current control: not assessed, medium impact, medium
    /// likelihood, with [`SKIP_NOTE`].
    ///
    /// # Errors
    ///
    /// Returns [`WalkerError::AlreadyComplete`] after the last control.
    pub fn skip(&mut self) -> Result<Advance, WalkerError> {
        self.submit(
            ControlStatus::NotAssessed,
            Impact::Medium,
            Likelihood::Medium,
            Some(SKIP_NOTE.to_string()),
        )
    }

    /// Step back one control within the current subdomain. Returns `false`
    /// when already at the first control of the subdomain; navigation
    /// never crosses a subdomain or domain boundary.
    ///
    /// # Errors
    ///
    /// Returns [`WalkerError::AlreadyComplete`] after the last control.
    pub fn go_back(&mut self) -> Result<bool, WalkerError> {
        if self.is_complete() {
            return Err(WalkerError::AlreadyComplete);
        }
        if self.control_index == 0 {
            return Ok(false);
        }
        self.control_index -= 1;
        Ok(true)
    }

    fn record(&mut self, judgement: ControlJudgement) {
        let key = judgement.key();
        match self.slots.get(&key) {
            Some(&slot) => self.judgements[slot] = judgement,
            None => {
                self.slots.insert(key, self.judgements.len());
                self.judgements.push(judgement);
            }
        }
    }

    fn advance(&mut self) -> Advance {
        let domains = self.catalog.domains();
        let section = &domains[self.domain_index];
        let controls = &section.subdomains[self.subdomain_index].controls;

        if self.control_index + 1 < controls.len() {
            self.control_index += 1;
        } else if self.subdomain_index + 1 < section.subdomains.len() {
            self.subdomain_index += 1;
            self.control_index = 0;
        } else if self.domain_index + 1 < domains.len() {
            self.domain_index += 1;
            self.subdomain_index = 0;
            self.control_index = 0;
        } else {
            let result = aggregate(self.judgements.clone());
            tracing::info!(
                judged = self.judgements.len(),
                overall_score = result.overall_score,
                "assessment complete"
            );
            self.result = Some(result);
            return Advance::Complete;
        }

        match self.current() {
            Some(next) => Advance::Next(next),
            None => Advance::Complete,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
