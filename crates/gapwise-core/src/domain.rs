//! # Framework Domain: Single Source of Truth
//!
//! Defines the [`Domain`] enum with the five top-level groupings of the
//! control framework. Every weight table, catalog file and report key
//! resolves to this one definition; adding a sixth domain is a compile
//! error in every exhaustive `match` until it is handled.
//!
//! | # | Domain | Serialized as |
//! |---|--------|---------------|
//! | 1 | Governance | `"Governance"` |
//! | 2 | Defence | `"Cybersecurity Defence"` |
//! | 3 | Resilience | `"Cybersecurity Resilience"` |
//! | 4 | ThirdPartyCloud | `"Third Party Cloud Computing Cybersecurity"` |
//! | 5 | IndustrialControl | `"Industrial Control System (ICS)"` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The five top-level domains of the control framework.
///
/// `Ord` follows declaration order, which is the canonical framework order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Domain {
    /// Cybersecurity governance: strategy, policies, roles, risk, audit.
    #[serde(rename = "Governance")]
    Governance,
    /// Technical and operational defence controls.
    #[serde(rename = "Cybersecurity Defence")]
    Defence,
    /// Business continuity aspects of cybersecurity.
    #[serde(rename = "Cybersecurity Resilience")]
    Resilience,
    /// Third-party and cloud-hosting cybersecurity.
    #[serde(rename = "Third Party Cloud Computing Cybersecurity")]
    ThirdPartyCloud,
    /// Operational technology and industrial control systems.
    #[serde(rename = "Industrial Control System (ICS)")]
    IndustrialControl,
}

/// Total number of framework domains.
pub const DOMAIN_COUNT: usize = 5;

impl Domain {
    /// All domains in canonical framework order.
    pub fn all() -> &'static [Domain] {
        &[
            Self::Governance,
            Self::Defence,
            Self::Resilience,
            Self::ThirdPartyCloud,
            Self::IndustrialControl,
        ]
    }

    /// The display name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Governance => "Governance",
            Self::Defence => "Cybersecurity Defence",
            Self::Resilience => "Cybersecurity Resilience",
            Self::ThirdPartyCloud => "Third Party Cloud Computing Cybersecurity",
            Self::IndustrialControl => "Industrial Control System (ICS)",
        }
    }

    /// Framework section number (1-based), used for control numbering.
    pub fn section(&self) -> u8 {
        match self {
            Self::Governance => 1,
            Self::Defence => 2,
            Self::Resilience => 3,
            Self::ThirdPartyCloud => 4,
            Self::IndustrialControl => 5,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ValidationError;

    /// Parse a domain from its exact display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDomain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_domains_count() {
        assert_eq!(Domain::all().len(), DOMAIN_COUNT);
    }

    #[test]
    fn all_domains_in_section_order() {
        let sections: Vec<u8> = Domain::all().iter().map(Domain::section).collect();
        assert_eq!(sections, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ord_follows_declaration_order() {
        let mut shuffled = vec![
            Domain::IndustrialControl,
            Domain::Governance,
            Domain::ThirdPartyCloud,
            Domain::Defence,
            Domain::Resilience,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Domain::all().to_vec());
    }

    #[test]
    fn as_str_roundtrip() {
        for domain in Domain::all() {
            let parsed: Domain = domain.as_str().parse().unwrap();
            assert_eq!(*domain, parsed);
        }
    }

    #[test]
    fn from_str_is_exact() {
        assert!("governance".parse::<Domain>().is_err());
        assert!("Cybersecurity Defense".parse::<Domain>().is_err());
        assert!("".parse::<Domain>().is_err());
        assert!(" Governance".parse::<Domain>().is_err());
    }

    #[test]
    fn serde_format_matches_as_str() {
        for domain in Domain::all() {
            let json = serde_json::to_string(domain).unwrap();
            assert_eq!(json, format!("\"{}\"", domain.as_str()));
        }
    }

    #[test]
    fn domain_works_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Domain::IndustrialControl, 10u8);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Industrial Control System (ICS)":10}"#);
    }
}
