//! # Judgement Ratings
//!
//! The three discrete inputs an assessor records for a control:
//! [`ControlStatus`], [`Impact`] and [`Likelihood`]. Each serializes to a
//! kebab-case identifier (`"partially-compliant"`, `"very-high"`) and
//! parses back from exactly that identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Assessed compliance status of a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlStatus {
    /// The control is fully implemented.
    Compliant,
    /// The control is implemented in part.
    PartiallyCompliant,
    /// The control is not implemented.
    NonCompliant,
    /// The assessor deferred judgement.
    NotAssessed,
}

impl ControlStatus {
    /// All statuses in presentation order.
    pub fn all() -> &'static [ControlStatus] {
        &[
            Self::Compliant,
            Self::PartiallyCompliant,
            Self::NonCompliant,
            Self::NotAssessed,
        ]
    }

    /// The kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::PartiallyCompliant => "partially-compliant",
            Self::NonCompliant => "non-compliant",
            Self::NotAssessed => "not-assessed",
        }
    }
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compliant" => Ok(Self::Compliant),
            "partially-compliant" => Ok(Self::PartiallyCompliant),
            "non-compliant" => Ok(Self::NonCompliant),
            "not-assessed" => Ok(Self::NotAssessed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// Business impact if the control fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    Critical,
    High,
    Medium,
    Low,
}

impl Impact {
    /// All impact ratings, most severe first.
    pub fn all() -> &'static [Impact] {
        &[Self::Critical, Self::High, Self::Medium, Self::Low]
    }

    /// The kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ValidationError::UnknownImpact(other.to_string())),
        }
    }
}

/// Likelihood that the control gap is exploited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Likelihood {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Likelihood {
    /// All likelihood ratings, most likely first.
    pub fn all() -> &'static [Likelihood] {
        &[
            Self::VeryHigh,
            Self::High,
            Self::Medium,
            Self::Low,
            Self::VeryLow,
        ]
    }

    /// The kebab-case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very-high",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very-low",
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Likelihood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very-high" => Ok(Self::VeryHigh),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "very-low" => Ok(Self::VeryLow),
            other => Err(ValidationError::UnknownLikelihood(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip_through_str_and_serde() {
        for status in ControlStatus::all() {
            assert_eq!(status.as_str().parse::<ControlStatus>().unwrap(), *status);
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn impact_roundtrip_through_str_and_serde() {
        for impact in Impact::all() {
            assert_eq!(impact.as_str().parse::<Impact>().unwrap(), *impact);
            let json = serde_json::to_string(impact).unwrap();
            assert_eq!(json, format!("\"{}\"", impact.as_str()));
        }
    }

    #[test]
    fn likelihood_roundtrip_through_str_and_serde() {
        for likelihood in Likelihood::all() {
            assert_eq!(
                likelihood.as_str().parse::<Likelihood>().unwrap(),
                *likelihood
            );
            let json = serde_json::to_string(likelihood).unwrap();
            assert_eq!(json, format!("\"{}\"", likelihood.as_str()));
        }
    }

    #[test]
    fn parsing_rejects_near_misses() {
        assert_eq!(
            "partially_compliant".parse::<ControlStatus>(),
            Err(ValidationError::UnknownStatus("partially_compliant".into()))
        );
        assert!("Compliant".parse::<ControlStatus>().is_err());
        assert!("severe".parse::<Impact>().is_err());
        assert!("very high".parse::<Likelihood>().is_err());
    }

    #[test]
    fn serde_rejects_unknown_status() {
        let err = serde_json::from_str::<ControlStatus>("\"mostly-compliant\"");
        assert!(err.is_err());
    }
}
