//! # Control Judgement
//!
//! The record an assessor produces for one control. The risk score is
//! computed once when the judgement is made and carried by value from the
//! walker to the aggregator and on to persistence.

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::key::ControlKey;
use crate::rating::{ControlStatus, Impact, Likelihood};

/// One assessor judgement for one control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlJudgement {
    pub domain: Domain,
    pub subdomain: String,
    pub control: String,
    pub status: ControlStatus,
    pub impact: Impact,
    pub likelihood: Likelihood,
    /// Derived severity in `[0, 10]`, one decimal place.
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ControlJudgement {
    /// The composite key of the judged control.
    pub fn key(&self) -> ControlKey {
        ControlKey::new(self.domain, self.subdomain.clone(), self.control.clone())
    }

    /// Whether this judgement names the given control.
    pub fn is_for(&self, key: &ControlKey) -> bool {
        self.domain == key.domain && self.subdomain == key.subdomain && self.control == key.control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ControlJudgement {
        ControlJudgement {
            domain: Domain::Defence,
            subdomain: "Cryptography".into(),
            control: "2-8-1".into(),
            status: ControlStatus::PartiallyCompliant,
            impact: Impact::High,
            likelihood: Likelihood::Medium,
            risk_score: 7.2,
            notes: None,
        }
    }

    #[test]
    fn key_matches_fields() {
        let j = sample();
        let key = j.key();
        assert!(j.is_for(&key));
        assert_eq!(key.control, "2-8-1");
    }

    #[test]
    fn notes_omitted_when_absent() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["status"], "partially-compliant");
        assert_eq!(json["domain"], "Cybersecurity Defence");
    }

    #[test]
    fn notes_default_when_missing_on_input() {
        let json = serde_json::json!({
            "domain": "Governance",
            "subdomain": "Risk Management",
            "control": "1-5-1",
            "status": "compliant",
            "impact": "low",
            "likelihood": "very-low",
            "risk_score": 0.2
        });
        let j: ControlJudgement = serde_json::from_value(json).unwrap();
        assert_eq!(j.notes, None);
        assert_eq!(j.domain, Domain::Governance);
    }
}
