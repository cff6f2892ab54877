//! Weight tables for the per-control risk score.

use gapwise_core::{ControlStatus, Domain, Impact, Likelihood};

/// Status multiplier applied when the status is not recognised.
pub const DEFAULT_STATUS_MULTIPLIER: f64 = 0.8;

/// Domain weight applied when the domain is not recognised.
pub const DEFAULT_DOMAIN_WEIGHT: f64 = 1.0;

/// Impact weight applied when the impact is not recognised (medium).
pub const DEFAULT_IMPACT_WEIGHT: f64 = 5.0;

/// Likelihood weight applied when the likelihood is not recognised (medium).
pub const DEFAULT_LIKELIHOOD_WEIGHT: f64 = 3.0;

pub fn impact_weight(impact: Impact) -> f64 {
    match impact {
        Impact::Critical => 10.0,
        Impact::High => 8.0,
        Impact::Medium => 5.0,
        Impact::Low => 2.0,
    }
}

pub fn likelihood_weight(likelihood: Likelihood) -> f64 {
    match likelihood {
        Likelihood::VeryHigh => 5.0,
        Likelihood::High => 4.0,
        Likelihood::Medium => 3.0,
        Likelihood::Low => 2.0,
        Likelihood::VeryLow => 1.0,
    }
}

pub fn status_multiplier(status: ControlStatus) -> f64 {
    match status {
        ControlStatus::Compliant => 0.1,
        ControlStatus::PartiallyCompliant => 0.6,
        ControlStatus::NonCompliant => 1.0,
        ControlStatus::NotAssessed => DEFAULT_STATUS_MULTIPLIER,
    }
}

/// Domains with a larger blast radius weigh more.
pub fn domain_weight(domain: Domain) -> f64 {
    match domain {
        Domain::Governance => 1.2,
        Domain::Defence => 1.0,
        Domain::Resilience => 1.1,
        Domain::ThirdPartyCloud => 0.9,
        Domain::IndustrialControl => 1.3,
    }
}
