//! Consistency check for results received from outside the process.
//!
//! A result is accepted only if it is exactly what [`aggregate`] produces
//! from its own `control_assessments`, and each judgement carries the risk
//! score its ratings imply.

use std::collections::HashSet;

use gapwise_risk::score;
use thiserror::Error;

use crate::aggregate::aggregate;
use crate::result::AssessmentResult;

/// Largest accepted difference between a carried and a recomputed risk
/// score. Scores have one decimal place.
const RISK_SCORE_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResultError {
    #[error("control {control:?} is assessed more than once")]
    DuplicateControl { control: String },

    #[error("control {control:?} carries risk score {actual}, its ratings give {expected}")]
    RiskScore {
        control: String,
        expected: f64,
        actual: f64,
    },

    #[error("{field} is {actual}, the judgements give {expected}")]
    Score {
        field: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("domain_scores do not match the judgements")]
    DomainScores,

    #[error("high_risk_controls must be the judgements scoring 7 or more, highest first")]
    HighRiskControls,

    #[error("recommendations do not match the judgements")]
    Recommendations,
}

/// Check that `result` is internally consistent.
///
/// # Errors
///
/// Returns the first mismatch found.
pub fn verify(result: &AssessmentResult) -> Result<(), ResultError> {
    let mut seen = HashSet::new();
    for j in &result.control_assessments {
        if !seen.insert(j.key()) {
            return Err(ResultError::DuplicateControl {
                control: j.control.clone(),
            });
        }
        let expected = score(j.status, j.impact, j.likelihood, j.domain);
        if (j.risk_score - expected).abs() > RISK_SCORE_TOLERANCE {
            return Err(ResultError::RiskScore {
                control: j.control.clone(),
                expected,
                actual: j.risk_score,
            });
        }
    }

    let expected = aggregate(result.control_assessments.clone());
    if result.overall_score != expected.overall_score {
        return Err(ResultError::Score {
            field: "overall_score",
            expected: expected.overall_score,
            actual: result.overall_score,
        });
    }
    if result.weighted_overall_score != expected.weighted_overall_score {
        return Err(ResultError::Score {
            field: "weighted_overall_score",
            expected: expected.weighted_overall_score,
            actual: result.weighted_overall_score,
        });
    }
    if result.domain_scores != expected.domain_scores {
        return Err(ResultError::DomainScores);
    }
    if result.high_risk_controls != expected.high_risk_controls {
        return Err(ResultError::HighRiskControls);
    }
    if result.recommendations != expected.recommendations {
        return Err(ResultError::Recommendations);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapwise_core::{ControlJudgement, ControlStatus, Domain, Impact, Likelihood};

    fn judge(control: &str, status: ControlStatus, impact: Impact) -> ControlJudgement {
        ControlJudgement {
            domain: Domain::Defence,
            subdomain: "Network".into(),
            control: control.into(),
            status,
            impact,
            likelihood: Likelihood::High,
            risk_score: score(status, impact, Likelihood::High, Domain::Defence),
            notes: None,
        }
    }

    fn sample() -> AssessmentResult {
        aggregate(vec![
            judge("2-1-1", ControlStatus::NonCompliant, Impact::Critical),
            judge("2-1-2", ControlStatus::Compliant, Impact::Low),
        ])
    }

    #[test]
    fn aggregated_result_passes() {
        assert_eq!(verify(&sample()), Ok(()));
        assert_eq!(verify(&aggregate(vec![])), Ok(()));
    }

    #[test]
    fn inflated_overall_score_rejected() {
        let mut result = sample();
        result.overall_score = 250;
        assert!(matches!(
            verify(&result),
            Err(ResultError::Score { field: "overall_score", actual: 250, .. })
        ));
    }

    #[test]
    fn high_risk_entry_outside_assessments_rejected() {
        let mut result = aggregate(vec![]);
        result
            .high_risk_controls
            .push(judge("ghost", ControlStatus::NonCompliant, Impact::Critical));
        assert_eq!(verify(&result), Err(ResultError::HighRiskControls));
    }

    #[test]
    fn high_risk_order_is_checked() {
        // 2 * 4 * 1.0 = 8.0 and 10 * 4 * 1.0 = 40 -> 10.
        let mut result = aggregate(vec![
            judge("a", ControlStatus::NonCompliant, Impact::Low),
            judge("b", ControlStatus::NonCompliant, Impact::Critical),
        ]);
        assert_eq!(result.high_risk_controls[0].control, "b");
        result.high_risk_controls.reverse();
        assert_eq!(verify(&result), Err(ResultError::HighRiskControls));
    }

    #[test]
    fn forged_risk_score_rejected() {
        let mut result = sample();
        result.control_assessments[1].risk_score = 9.9;
        assert!(matches!(verify(&result), Err(ResultError::RiskScore { .. })));
    }

    #[test]
    fn duplicate_control_rejected() {
        let j = judge("2-1-1", ControlStatus::Compliant, Impact::Low);
        let result = aggregate(vec![j.clone(), j]);
        assert!(matches!(
            verify(&result),
            Err(ResultError::DuplicateControl { .. })
        ));
    }

    #[test]
    fn edited_recommendations_rejected() {
        let mut result = sample();
        result.recommendations.clear();
        assert_eq!(verify(&result), Err(ResultError::Recommendations));
    }
}
