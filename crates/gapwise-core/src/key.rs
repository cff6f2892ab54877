//! # Control Key
//!
//! The composite `(domain, subdomain, control)` key that identifies one
//! control in the catalog and one slot in an assessment's judgement arena.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// Identifies one control by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlKey {
    pub domain: Domain,
    pub subdomain: String,
    pub control: String,
}

impl ControlKey {
    pub fn new(domain: Domain, subdomain: impl Into<String>, control: impl Into<String>) -> Self {
        Self {
            domain,
            subdomain: subdomain.into(),
            control: control.into(),
        }
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.domain, self.subdomain, self.control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_with_same_parts_are_equal() {
        let a = ControlKey::new(Domain::Governance, "Risk Management", "1-5-1");
        let b = ControlKey::new(Domain::Governance, "Risk Management", "1-5-1");
        assert_eq!(a, b);
    }

    #[test]
    fn keys_differ_by_domain() {
        let a = ControlKey::new(Domain::Governance, "X", "c");
        let b = ControlKey::new(Domain::Defence, "X", "c");
        assert_ne!(a, b);
    }

    #[test]
    fn display_joins_parts() {
        let key = ControlKey::new(Domain::Resilience, "Continuity", "3-1-1");
        assert_eq!(
            key.to_string(),
            "Cybersecurity Resilience / Continuity / 3-1-1"
        );
    }
}
