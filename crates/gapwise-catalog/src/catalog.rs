//! # Control Catalog
//!
//! The ordered three-level hierarchy: domain → subdomain → control. Order
//! at every level is significant because the assessment walker visits
//! controls exactly in catalog order.
//!
//! A [`ControlCatalog`] can only be obtained through a loader, and every
//! loader runs the same pipeline:
//!
//! 1. Parse YAML (or JSON) into a `serde_json::Value`.
//! 2. Validate structure against the embedded JSON Schema.
//! 3. Decode into the typed model.
//! 4. Check semantic rules the schema leaves open (non-empty levels,
//!    uniqueness, blank names).
//!
//! Consumers may therefore index the catalog without re-checking bounds
//! invariants: every domain has at least one subdomain and every subdomain
//! has at least one control.

use std::collections::HashSet;
use std::path::Path;

use gapwise_core::{ControlKey, Domain};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::schema;

/// The embedded Essential Cybersecurity Controls catalog.
const ECC_CATALOG_YAML: &str = include_str!("../catalog/ecc.yaml");

/// Framework label used when a custom catalog does not name one.
const UNNAMED_FRAMEWORK: &str = "custom";

/// One subdomain and its ordered controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdomain {
    pub name: String,
    pub controls: Vec<String>,
}

/// One domain and its ordered subdomains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSection {
    pub domain: Domain,
    pub subdomains: Vec<Subdomain>,
}

impl DomainSection {
    /// Total controls across all subdomains of this domain.
    pub fn control_count(&self) -> usize {
        self.subdomains.iter().map(|s| s.controls.len()).sum()
    }
}

/// A validated, immutable control catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlCatalog {
    framework: String,
    domains: Vec<DomainSection>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    framework: Option<String>,
    domains: Vec<DomainSection>,
}

/// A control together with its position in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub domain: Domain,
    pub subdomain: &'a str,
    pub control: &'a str,
    pub domain_index: usize,
    pub subdomain_index: usize,
    pub control_index: usize,
}

impl CatalogEntry<'_> {
    /// The owned composite key of this control.
    pub fn key(&self) -> ControlKey {
        ControlKey::new(self.domain, self.subdomain, self.control)
    }
}

impl ControlCatalog {
    /// The built-in Essential Cybersecurity Controls catalog.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded catalog is corrupt, which the test suite
    /// rules out.
    pub fn ecc_default() -> Result<Self, CatalogError> {
        Self::from_yaml_str(ECC_CATALOG_YAML)
    }

    /// Load a catalog from a YAML or JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::FileNotFound`] or [`CatalogError::Io`] if the
    /// file cannot be read, and any parse or validation error otherwise.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            framework = %catalog.framework,
            domains = catalog.domains.len(),
            controls = catalog.total_controls(),
            "loaded control catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from YAML text. JSON is accepted as a YAML subset.
    ///
    /// # Errors
    ///
    /// Returns a parse, schema or semantic validation error.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_yaml::from_str(content)?;
        Self::from_json_value(value)
    }

    /// Build a catalog from an already-parsed JSON document.
    ///
    /// # Errors
    ///
    /// Returns a schema or semantic validation error.
    pub fn from_json_value(value: Value) -> Result<Self, CatalogError> {
        schema::validate_document(&value)?;
        let doc: CatalogDocument = serde_json::from_value(value)?;
        let catalog = Self {
            framework: doc
                .framework
                .unwrap_or_else(|| UNNAMED_FRAMEWORK.to_string()),
            domains: doc.domains,
        };
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> Result<(), CatalogError> {
        let mut seen_domains = HashSet::new();
        for section in &self.domains {
            let domain = section.domain;
            if !seen_domains.insert(domain) {
                return Err(CatalogError::DuplicateDomain { domain });
            }
            if section.subdomains.is_empty() {
                return Err(CatalogError::EmptyDomain { domain });
            }
            let mut seen_subdomains = HashSet::new();
            for sub in &section.subdomains {
                if sub.name.trim().is_empty() {
                    return Err(CatalogError::BlankSubdomain { domain });
                }
                if !seen_subdomains.insert(sub.name.as_str()) {
                    return Err(CatalogError::DuplicateSubdomain {
                        domain,
                        subdomain: sub.name.clone(),
                    });
                }
                if sub.controls.is_empty() {
                    return Err(CatalogError::EmptySubdomain {
                        domain,
                        subdomain: sub.name.clone(),
                    });
                }
                let mut seen_controls = HashSet::new();
                for control in &sub.controls {
                    if control.trim().is_empty() {
                        return Err(CatalogError::BlankControl {
                            domain,
                            subdomain: sub.name.clone(),
                        });
                    }
                    if !seen_controls.insert(control.as_str()) {
                        return Err(CatalogError::DuplicateControl {
                            domain,
                            subdomain: sub.name.clone(),
                            control: control.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The framework label, e.g. `"ECC-1:2018"`.
    pub fn framework(&self) -> &str {
        &self.framework
    }

    /// Domains in catalog order.
    pub fn domains(&self) -> &[DomainSection] {
        &self.domains
    }

    /// Look up a domain section.
    pub fn domain(&self, domain: Domain) -> Option<&DomainSection> {
        self.domains.iter().find(|s| s.domain == domain)
    }

    /// Subdomains of `domain` in catalog order, or an empty slice if the
    /// catalog does not cover that domain.
    pub fn subdomains(&self, domain: Domain) -> &[Subdomain] {
        self.domain(domain)
            .map(|s| s.subdomains.as_slice())
            .unwrap_or_default()
    }

    /// Controls of one subdomain in catalog order.
    pub fn controls(&self, domain: Domain, subdomain: &str) -> &[String] {
        self.subdomains(domain)
            .iter()
            .find(|s| s.name == subdomain)
            .map(|s| s.controls.as_slice())
            .unwrap_or_default()
    }

    /// Total number of controls in the catalog.
    pub fn total_controls(&self) -> usize {
        self.domains.iter().map(DomainSection::control_count).sum()
    }

    /// Whether the catalog contains the given control.
    pub fn contains(&self, key: &ControlKey) -> bool {
        self.controls(key.domain, &key.subdomain)
            .iter()
            .any(|c| *c == key.control)
    }

    /// Resolve a position to an entry. Returns `None` if any index is out
    /// of range.
    pub fn entry_at(
        &self,
        domain_index: usize,
        subdomain_index: usize,
        control_index: usize,
    ) -> Option<CatalogEntry<'_>> {
        let section = self.domains.get(domain_index)?;
        let sub = section.subdomains.get(subdomain_index)?;
        let control = sub.controls.get(control_index)?;
        Some(CatalogEntry {
            domain: section.domain,
            subdomain: &sub.name,
            control,
            domain_index,
            subdomain_index,
            control_index,
        })
    }

    /// Every control in walk order.
    pub fn iter(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.domains.iter().enumerate().flat_map(|(di, section)| {
            section
                .subdomains
                .iter()
                .enumerate()
                .flat_map(move |(si, sub)| {
                    sub.controls
                        .iter()
                        .enumerate()
                        .map(move |(ci, control)| CatalogEntry {
                            domain: section.domain,
                            subdomain: &sub.name,
                            control,
                            domain_index: di,
                            subdomain_index: si,
                            control_index: ci,
                        })
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small() -> ControlCatalog {
        ControlCatalog::from_json_value(json!({
            "framework": "test",
            "domains": [
                {"domain": "Governance", "subdomains": [
                    {"name": "Strategy", "controls": ["G1", "G2"]},
                    {"name": "Audit", "controls": ["G3"]}
                ]},
                {"domain": "Industrial Control System (ICS)", "subdomains": [
                    {"name": "OT", "controls": ["I1"]}
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn ecc_default_loads() {
        let catalog = ControlCatalog::ecc_default().unwrap();
        assert_eq!(catalog.framework(), "ECC-1:2018");
        assert_eq!(catalog.domains().len(), 5);
        let order: Vec<Domain> = catalog.domains().iter().map(|s| s.domain).collect();
        assert_eq!(order, Domain::all().to_vec());
    }

    #[test]
    fn ecc_default_subdomain_counts() {
        let catalog = ControlCatalog::ecc_default().unwrap();
        assert_eq!(catalog.subdomains(Domain::Governance).len(), 10);
        assert_eq!(catalog.subdomains(Domain::Defence).len(), 15);
        assert_eq!(catalog.subdomains(Domain::Resilience).len(), 1);
        assert_eq!(catalog.subdomains(Domain::ThirdPartyCloud).len(), 2);
        assert_eq!(catalog.subdomains(Domain::IndustrialControl).len(), 1);
    }

    #[test]
    fn iter_visits_controls_in_catalog_order() {
        let catalog = small();
        let controls: Vec<&str> = catalog.iter().map(|e| e.control).collect();
        assert_eq!(controls, vec!["G1", "G2", "G3", "I1"]);
        assert_eq!(catalog.iter().count(), catalog.total_controls());
    }

    #[test]
    fn entry_at_resolves_positions() {
        let catalog = small();
        let entry = catalog.entry_at(0, 1, 0).unwrap();
        assert_eq!(entry.subdomain, "Audit");
        assert_eq!(entry.control, "G3");
        assert!(catalog.entry_at(0, 1, 1).is_none());
        assert!(catalog.entry_at(2, 0, 0).is_none());
    }

    #[test]
    fn lookups_for_missing_domain_are_empty() {
        let catalog = small();
        assert!(catalog.subdomains(Domain::Defence).is_empty());
        assert!(catalog.controls(Domain::Governance, "Nope").is_empty());
    }

    #[test]
    fn contains_checks_full_key() {
        let catalog = small();
        assert!(catalog.contains(&ControlKey::new(Domain::Governance, "Strategy", "G2")));
        assert!(!catalog.contains(&ControlKey::new(Domain::Governance, "Audit", "G2")));
    }

    #[test]
    fn missing_framework_defaults() {
        let catalog = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": [{"name": "S", "controls": ["c"]}]}]
        }))
        .unwrap();
        assert_eq!(catalog.framework(), "custom");
    }

    #[test]
    fn empty_catalog_rejected() {
        let err = ControlCatalog::from_json_value(json!({"domains": []})).unwrap_err();
        assert!(matches!(err, CatalogError::SchemaViolation { .. }));
    }

    #[test]
    fn duplicate_domain_rejected() {
        let err = ControlCatalog::from_json_value(json!({
            "domains": [
                {"domain": "Governance", "subdomains": [{"name": "A", "controls": ["c"]}]},
                {"domain": "Governance", "subdomains": [{"name": "B", "controls": ["d"]}]}
            ]
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateDomain {
                domain: Domain::Governance
            }
        ));
    }

    #[test]
    fn empty_levels_rejected() {
        let err = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": []}]
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyDomain { .. }));

        let err = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": [{"name": "A", "controls": []}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptySubdomain { .. }));
    }

    #[test]
    fn blank_and_duplicate_names_rejected() {
        let err = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": [{"name": "  ", "controls": ["c"]}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::BlankSubdomain { .. }));

        let err = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": [
                {"name": "A", "controls": ["c"]},
                {"name": "A", "controls": ["d"]}
            ]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSubdomain { .. }));

        let err = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": [{"name": "A", "controls": ["c", "c"]}]}]
        }))
        .unwrap_err();
        match err {
            CatalogError::DuplicateControl { control, .. } => assert_eq!(control, "c"),
            other => panic!("expected DuplicateControl, got {other:?}"),
        }

        let err = ControlCatalog::from_json_value(json!({
            "domains": [{"domain": "Governance", "subdomains": [{"name": "A", "controls": [""]}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CatalogError::BlankControl { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(
            &path,
            "framework: mini\ndomains:\n  - domain: Cybersecurity Resilience\n    subdomains:\n      - name: BCM\n        controls: [\"3-1-1\"]\n",
        )
        .unwrap();
        let catalog = ControlCatalog::load(&path).unwrap();
        assert_eq!(catalog.framework(), "mini");
        assert_eq!(catalog.total_controls(), 1);
    }

    #[test]
    fn load_missing_file() {
        let err = ControlCatalog::load(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }

    #[test]
    fn serializes_in_document_shape() {
        let json = serde_json::to_value(small()).unwrap();
        assert_eq!(json["framework"], "test");
        assert_eq!(json["domains"][1]["domain"], "Industrial Control System (ICS)");
        assert_eq!(json["domains"][0]["subdomains"][0]["controls"][1], "G2");
    }
}
