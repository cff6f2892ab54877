//! # Aggregation
//!
//! Compliance credit per judgement: compliant = 1, partially compliant =
//! 0.5, anything else = 0.
//!
//! - Domain score: `round(credit / judged × 100)` over that domain's
//!   judgements.
//! - Overall score: `round(mean(domain scores))`, unweighted, so a domain
//!   with one judged control counts as much as one with fifty.
//! - Weighted overall score: `round(credit / judged × 100)` over every
//!   judgement.
//!
//! Both overall scores are 0 when there are no judgements.

use gapwise_core::{ControlJudgement, ControlStatus, Domain};
use gapwise_risk::HIGH_RISK_THRESHOLD;

use crate::recommend::recommendations;
use crate::result::{AssessmentResult, DomainScores};

#[derive(Default)]
struct Tally {
    total: u32,
    compliant: u32,
    partial: u32,
}

impl Tally {
    fn add(&mut self, status: ControlStatus) {
        self.total += 1;
        match status {
            ControlStatus::Compliant => self.compliant += 1,
            ControlStatus::PartiallyCompliant => self.partial += 1,
            ControlStatus::NonCompliant | ControlStatus::NotAssessed => {}
        }
    }

    fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let credit = f64::from(self.compliant) + 0.5 * f64::from(self.partial);
        (credit / f64::from(self.total) * 100.0).round() as u8
    }
}

/// Build the report for a completed assessment.
pub fn aggregate(judgements: Vec<ControlJudgement>) -> AssessmentResult {
    let mut tallies: Vec<(Domain, Tally)> = Vec::new();
    let mut everything = Tally::default();
    for j in &judgements {
        everything.add(j.status);
        match tallies.iter_mut().find(|(d, _)| *d == j.domain) {
            Some((_, tally)) => tally.add(j.status),
            None => {
                let mut tally = Tally::default();
                tally.add(j.status);
                tallies.push((j.domain, tally));
            }
        }
    }

    let mut domain_scores = DomainScores::new();
    for (domain, tally) in &tallies {
        domain_scores.insert(*domain, tally.percent());
    }

    let overall_score = if domain_scores.is_empty() {
        0
    } else {
        let sum: f64 = domain_scores.iter().map(|(_, s)| f64::from(s)).sum();
        (sum / domain_scores.len() as f64).round() as u8
    };

    let high_risk_controls = high_risk(&judgements);
    let recommendations = recommendations(&domain_scores, &judgements, high_risk_controls.len());

    AssessmentResult {
        overall_score,
        weighted_overall_score: everything.percent(),
        domain_scores,
        control_assessments: judgements,
        high_risk_controls,
        recommendations,
    }
}

/// Judgements at or above the high-risk threshold, highest score first.
/// The sort is stable: equal scores keep traversal order.
fn high_risk(judgements: &[ControlJudgement]) -> Vec<ControlJudgement> {
    let mut high: Vec<ControlJudgement> = judgements
        .iter()
        .filter(|j| j.risk_score >= HIGH_RISK_THRESHOLD)
        .cloned()
        .collect();
    high.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    high
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapwise_core::{Impact, Likelihood};
    use gapwise_risk::score;

    fn judge(
        domain: Domain,
        control: &str,
        status: ControlStatus,
        impact: Impact,
        likelihood: Likelihood,
    ) -> ControlJudgement {
        ControlJudgement {
            domain,
            subdomain: "Sub".into(),
            control: control.into(),
            status,
            impact,
            likelihood,
            risk_score: score(status, impact, likelihood, domain),
            notes: None,
        }
    }

    #[test]
    fn empty_input_scores_zero() {
        let result = aggregate(vec![]);
        assert_eq!(result.overall_score, 0);
        assert_eq!(result.weighted_overall_score, 0);
        assert!(result.domain_scores.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn domain_score_counts_partial_as_half() {
        let result = aggregate(vec![
            judge(Domain::Defence, "a", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
            judge(Domain::Defence, "b", ControlStatus::PartiallyCompliant, Impact::Low, Likelihood::Low),
            judge(Domain::Defence, "c", ControlStatus::NonCompliant, Impact::Low, Likelihood::Low),
            judge(Domain::Defence, "d", ControlStatus::NotAssessed, Impact::Low, Likelihood::Low),
        ]);
        // (1 + 0.5) / 4 = 37.5 -> 38
        assert_eq!(result.domain_scores.get(Domain::Defence), Some(38));
    }

    #[test]
    fn no_zero_fill_for_unjudged_domains() {
        let result = aggregate(vec![judge(
            Domain::Resilience,
            "r",
            ControlStatus::Compliant,
            Impact::Low,
            Likelihood::Low,
        )]);
        assert_eq!(result.domain_scores.len(), 1);
        assert_eq!(result.domain_scores.get(Domain::Governance), None);
        assert_eq!(result.overall_score, 100);
    }

    #[test]
    fn overall_is_unweighted_mean_of_domains() {
        // Governance: 1 of 1 compliant (100). Defence: 0 of 3 (0).
        let result = aggregate(vec![
            judge(Domain::Governance, "g", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
            judge(Domain::Defence, "d1", ControlStatus::NonCompliant, Impact::Low, Likelihood::Low),
            judge(Domain::Defence, "d2", ControlStatus::NonCompliant, Impact::Low, Likelihood::Low),
            judge(Domain::Defence, "d3", ControlStatus::NonCompliant, Impact::Low, Likelihood::Low),
        ]);
        assert_eq!(result.overall_score, 50);
        assert_eq!(result.weighted_overall_score, 25);
    }

    #[test]
    fn domain_scores_in_first_judged_order() {
        let result = aggregate(vec![
            judge(Domain::IndustrialControl, "i", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
            judge(Domain::Governance, "g", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
            judge(Domain::IndustrialControl, "i2", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
        ]);
        let order: Vec<Domain> = result.domain_scores.domains().collect();
        assert_eq!(order, vec![Domain::IndustrialControl, Domain::Governance]);
    }

    #[test]
    fn high_risk_sorted_descending_and_stable() {
        let judgements = vec![
            // 8 * 3 * 0.6 * 1.0 = 14.4 -> 10
            judge(Domain::Defence, "first-ten", ControlStatus::PartiallyCompliant, Impact::High, Likelihood::Medium),
            // 5 * 2 * 0.8 * 1.0 = 8.0
            judge(Domain::Defence, "eight", ControlStatus::NotAssessed, Impact::Medium, Likelihood::Low),
            judge(Domain::Defence, "low", ControlStatus::Compliant, Impact::Low, Likelihood::VeryLow),
            // 10 * 5 * 1.0 * 1.0 = 50 -> 10
            judge(Domain::Defence, "second-ten", ControlStatus::NonCompliant, Impact::Critical, Likelihood::VeryHigh),
        ];
        let result = aggregate(judgements);
        let names: Vec<&str> = result
            .high_risk_controls
            .iter()
            .map(|j| j.control.as_str())
            .collect();
        assert_eq!(names, vec!["first-ten", "second-ten", "eight"]);
        for j in &result.high_risk_controls {
            assert!(result.control_assessments.contains(j));
        }
    }

    #[test]
    fn control_assessments_preserve_input() {
        let judgements = vec![
            judge(Domain::Governance, "b", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
            judge(Domain::Governance, "a", ControlStatus::Compliant, Impact::Low, Likelihood::Low),
        ];
        let result = aggregate(judgements.clone());
        assert_eq!(result.control_assessments, judgements);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let judgements = vec![
            judge(Domain::Governance, "g", ControlStatus::PartiallyCompliant, Impact::High, Likelihood::High),
            judge(Domain::Defence, "d", ControlStatus::NonCompliant, Impact::Critical, Likelihood::High),
        ];
        assert_eq!(aggregate(judgements.clone()), aggregate(judgements));
    }
}
