//! # Per-Control Risk Score
//!
//! `min(round(impact × likelihood × status × domain × 10) / 10, 10)`
//!
//! The result lies in `[0, 10]` with one decimal place. The cap matters:
//! the raw product reaches 65 for a non-compliant, critical, very likely
//! ICS control.

use gapwise_core::{ControlStatus, Domain, Impact, Likelihood};

use crate::weights::{
    domain_weight, impact_weight, likelihood_weight, status_multiplier, DEFAULT_DOMAIN_WEIGHT,
    DEFAULT_IMPACT_WEIGHT, DEFAULT_LIKELIHOOD_WEIGHT, DEFAULT_STATUS_MULTIPLIER,
};

/// Upper bound of the risk score.
pub const MAX_RISK_SCORE: f64 = 10.0;

/// Scores at or above this value are reported as high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 7.0;

fn finish(raw: f64) -> f64 {
    ((raw * 10.0).round() / 10.0).min(MAX_RISK_SCORE)
}

/// Risk score for a fully typed judgement.
pub fn score(status: ControlStatus, impact: Impact, likelihood: Likelihood, domain: Domain) -> f64 {
    finish(
        impact_weight(impact)
            * likelihood_weight(likelihood)
            * status_multiplier(status)
            * domain_weight(domain),
    )
}

/// Risk score from raw identifiers.
///
/// Unrecognised values never fail. They fall back to: status 0.8
/// (not-assessed), impact medium, likelihood medium, domain 1.0.
pub fn score_lenient(status: &str, impact: &str, likelihood: &str, domain: &str) -> f64 {
    let status = status
        .parse::<ControlStatus>()
        .map_or(DEFAULT_STATUS_MULTIPLIER, status_multiplier);
    let impact = impact
        .parse::<Impact>()
        .map_or(DEFAULT_IMPACT_WEIGHT, impact_weight);
    let likelihood = likelihood
        .parse::<Likelihood>()
        .map_or(DEFAULT_LIKELIHOOD_WEIGHT, likelihood_weight);
    let domain = domain
        .parse::<Domain>()
        .map_or(DEFAULT_DOMAIN_WEIGHT, domain_weight);
    finish(impact * likelihood * status * domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn lowest_risk_example() {
        let s = score(
            ControlStatus::Compliant,
            Impact::Low,
            Likelihood::VeryLow,
            Domain::ThirdPartyCloud,
        );
        assert!(close(s, 0.2), "got {s}");
    }

    #[test]
    fn capped_at_ten() {
        let s = score(
            ControlStatus::NonCompliant,
            Impact::Critical,
            Likelihood::VeryHigh,
            Domain::IndustrialControl,
        );
        assert!(close(s, 10.0), "got {s}");
    }

    #[test]
    fn rounding_to_one_decimal() {
        // 8 * 4 * 0.1 * 1.2 = 3.84
        let s = score(
            ControlStatus::Compliant,
            Impact::High,
            Likelihood::High,
            Domain::Governance,
        );
        assert!(close(s, 3.8), "got {s}");
        // 2 * 2 * 0.6 * 1.0 = 2.4
        let s = score(
            ControlStatus::PartiallyCompliant,
            Impact::Low,
            Likelihood::Low,
            Domain::Defence,
        );
        assert!(close(s, 2.4), "got {s}");
    }

    #[test]
    fn compliant_critical_governance() {
        let s = score(
            ControlStatus::Compliant,
            Impact::Critical,
            Likelihood::VeryHigh,
            Domain::Governance,
        );
        assert!(close(s, 6.0), "got {s}");
    }

    #[test]
    fn skipped_control_scores_above_threshold_everywhere() {
        for domain in Domain::all() {
            let s = score(
                ControlStatus::NotAssessed,
                Impact::Medium,
                Likelihood::Medium,
                *domain,
            );
            assert!(s >= HIGH_RISK_THRESHOLD, "{domain}: {s}");
        }
    }

    #[test]
    fn lenient_matches_typed_for_known_values() {
        let typed = score(
            ControlStatus::PartiallyCompliant,
            Impact::Medium,
            Likelihood::Medium,
            Domain::Defence,
        );
        let lenient = score_lenient(
            "partially-compliant",
            "medium",
            "medium",
            "Cybersecurity Defence",
        );
        assert!(close(typed, lenient));
        assert!(close(lenient, 9.0));
    }

    #[test]
    fn lenient_unknown_status_uses_default() {
        // 10 * 5 * 0.8 * 1.0 = 40 -> capped
        assert!(close(
            score_lenient("maybe", "critical", "very-high", "Cybersecurity Defence"),
            10.0
        ));
        // 2 * 1 * 0.8 * 1.0 = 1.6
        assert!(close(
            score_lenient("maybe", "low", "very-low", "Cybersecurity Defence"),
            1.6
        ));
    }

    #[test]
    fn lenient_unknown_domain_uses_weight_one() {
        // 2 * 1 * 1.0 * 1.0 = 2.0
        assert!(close(
            score_lenient("non-compliant", "low", "very-low", "Physical Security"),
            2.0
        ));
    }

    #[test]
    fn lenient_unknown_impact_and_likelihood_use_medium() {
        // 5 * 3 * 0.1 * 1.0 = 1.5
        assert!(close(
            score_lenient("compliant", "extreme", "sometimes", "Cybersecurity Defence"),
            1.5
        ));
    }

    fn any_status() -> impl Strategy<Value = ControlStatus> {
        prop::sample::select(ControlStatus::all().to_vec())
    }

    fn any_impact() -> impl Strategy<Value = Impact> {
        prop::sample::select(Impact::all().to_vec())
    }

    fn any_likelihood() -> impl Strategy<Value = Likelihood> {
        prop::sample::select(Likelihood::all().to_vec())
    }

    fn any_domain() -> impl Strategy<Value = Domain> {
        prop::sample::select(Domain::all().to_vec())
    }

    proptest! {
        #[test]
        fn score_in_range(s in any_status(), i in any_impact(), l in any_likelihood(), d in any_domain()) {
            let v = score(s, i, l, d);
            prop_assert!((0.0..=MAX_RISK_SCORE).contains(&v));
        }

        #[test]
        fn score_is_deterministic(s in any_status(), i in any_impact(), l in any_likelihood(), d in any_domain()) {
            prop_assert_eq!(score(s, i, l, d).to_bits(), score(s, i, l, d).to_bits());
        }

        #[test]
        fn score_has_one_decimal(s in any_status(), i in any_impact(), l in any_likelihood(), d in any_domain()) {
            let v = score(s, i, l, d) * 10.0;
            prop_assert!((v - v.round()).abs() < 1e-9);
        }

        #[test]
        fn lenient_never_leaves_range(status in ".{0,20}", impact in ".{0,20}", likelihood in ".{0,20}", domain in ".{0,40}") {
            let v = score_lenient(&status, &impact, &likelihood, &domain);
            prop_assert!((0.0..=MAX_RISK_SCORE).contains(&v));
        }
    }
}
