//! The aggregated report of one completed assessment.

use std::fmt;

use gapwise_core::{ControlJudgement, Domain};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Aggregated outcome of one assessment run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Unweighted mean of the domain scores, 0–100.
    pub overall_score: u8,
    /// Mean compliance credit over all judged controls, 0–100.
    pub weighted_overall_score: u8,
    pub domain_scores: DomainScores,
    pub control_assessments: Vec<ControlJudgement>,
    /// Judgements scoring at least 7, highest first.
    pub high_risk_controls: Vec<ControlJudgement>,
    pub recommendations: Vec<String>,
}

impl AssessmentResult {
    /// SHA-256 hex digest of the canonical JSON serialization.
    ///
    /// # Errors
    ///
    /// Returns a serialization error, which cannot happen for results
    /// built by [`crate::aggregate`].
    pub fn digest(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&bytes);
        Ok(hash.iter().map(|b| format!("{b:02x}")).collect())
    }
}

/// Per-domain compliance percentages in first-judged order.
///
/// Serialized as a JSON object whose key order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainScores(Vec<(Domain, u8)>);

impl DomainScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score for `domain`, keeping its original position if present.
    pub fn insert(&mut self, domain: Domain, score: u8) {
        match self.0.iter_mut().find(|(d, _)| *d == domain) {
            Some(slot) => slot.1 = score,
            None => self.0.push((domain, score)),
        }
    }

    pub fn get(&self, domain: Domain) -> Option<u8> {
        self.0.iter().find(|(d, _)| *d == domain).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Domain, u8)> + '_ {
        self.0.iter().copied()
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.0.iter().map(|(d, _)| *d)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for DomainScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (domain, score) in &self.0 {
            map.serialize_entry(domain, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DomainScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = DomainScores;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of domain name to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = DomainScores::new();
                while let Some((domain, score)) = access.next_entry::<Domain, u8>()? {
                    if scores.get(domain).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate domain {domain}"
                        )));
                    }
                    if score > 100 {
                        return Err(serde::de::Error::custom(format!(
                            "score for {domain} exceeds 100"
                        )));
                    }
                    scores.insert(domain, score);
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut scores = DomainScores::new();
        scores.insert(Domain::Resilience, 10);
        scores.insert(Domain::Governance, 20);
        scores.insert(Domain::Resilience, 30);
        let order: Vec<_> = scores.iter().collect();
        assert_eq!(
            order,
            vec![(Domain::Resilience, 30), (Domain::Governance, 20)]
        );
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut scores = DomainScores::new();
        scores.insert(Domain::IndustrialControl, 75);
        scores.insert(Domain::Governance, 40);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(
            json,
            r#"{"Industrial Control System (ICS)":75,"Governance":40}"#
        );
        let back: DomainScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }

    #[test]
    fn deserialize_rejects_unknown_domain_and_bad_score() {
        assert!(serde_json::from_str::<DomainScores>(r#"{"Physical": 10}"#).is_err());
        assert!(serde_json::from_str::<DomainScores>(r#"{"Governance": 101}"#).is_err());
    }

    #[test]
    fn digest_is_stable_hex() {
        let result = AssessmentResult {
            overall_score: 0,
            weighted_overall_score: 0,
            domain_scores: DomainScores::new(),
            control_assessments: vec![],
            high_risk_controls: vec![],
            recommendations: vec![],
        };
        let a = result.digest().unwrap();
        let b = result.clone().digest().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
