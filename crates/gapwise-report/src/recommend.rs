//! Recommendation text generation.
//!
//! Groups are emitted in a fixed order:
//!
//! 1. `Critical:` for each domain scoring below 40.
//! 2. `Priority:` for each domain scoring from 40 up to (not including) 70.
//! 3. `Immediate action required:` for each non-compliant control with
//!    critical impact, in traversal order.
//! 4. `Risk management priority:` once, when more than five controls are
//!    high risk.

use gapwise_core::{ControlJudgement, ControlStatus, Impact};

use crate::result::DomainScores;

/// Domains scoring below this are critical.
pub const CRITICAL_DOMAIN_BELOW: u8 = 40;
/// Domains scoring below this (and not critical) are a priority.
pub const PRIORITY_DOMAIN_BELOW: u8 = 70;
/// More high-risk controls than this triggers the summary message.
pub const HIGH_RISK_SUMMARY_ABOVE: usize = 5;

pub fn recommendations(
    domain_scores: &DomainScores,
    judgements: &[ControlJudgement],
    high_risk_count: usize,
) -> Vec<String> {
    let mut out = Vec::new();

    for (domain, score) in domain_scores.iter() {
        if score < CRITICAL_DOMAIN_BELOW {
            out.push(format!(
                "Critical: {domain} compliance is {score}%. Remediate this domain urgently \
                 and assign an accountable owner."
            ));
        }
    }

    for (domain, score) in domain_scores.iter() {
        if (CRITICAL_DOMAIN_BELOW..PRIORITY_DOMAIN_BELOW).contains(&score) {
            out.push(format!(
                "Priority: {domain} compliance is {score}%. Strengthen partially \
                 implemented controls in this domain."
            ));
        }
    }

    for j in judgements {
        if j.status == ControlStatus::NonCompliant && j.impact == Impact::Critical {
            out.push(format!(
                "Immediate action required: {} ({} / {}) is non-compliant with critical impact.",
                j.control, j.domain, j.subdomain
            ));
        }
    }

    if high_risk_count > HIGH_RISK_SUMMARY_ABOVE {
        out.push(format!(
            "Risk management priority: {high_risk_count} controls have a risk score of 7 or \
             higher. Establish a remediation plan for them."
        ));
    }

    out
}
