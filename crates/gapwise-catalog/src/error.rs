//! Catalog loading and validation errors.
//!
//! Every error carries enough context (file path, domain, subdomain) to
//! point an operator at the offending entry of a custom catalog.

use std::path::PathBuf;

use gapwise_core::Domain;
use thiserror::Error;

/// Errors raised while loading or validating a control catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file does not exist.
    #[error("catalog file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The catalog file exists but could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse catalog YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// The parsed document could not be mapped onto the catalog model.
    #[error("failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),

    /// The embedded catalog schema failed to compile.
    #[error("catalog schema is invalid: {0}")]
    SchemaCompile(String),

    /// The document does not match the catalog schema.
    #[error("catalog failed schema validation with {} violation(s):\n{}", .violations.len(), .violations.join("\n"))]
    SchemaViolation { violations: Vec<String> },

    /// A domain appears more than once.
    #[error("domain {domain} is listed more than once")]
    DuplicateDomain { domain: Domain },

    /// A domain has no subdomains.
    #[error("domain {domain} has no subdomains")]
    EmptyDomain { domain: Domain },

    /// A subdomain name is blank.
    #[error("domain {domain} has a subdomain with a blank name")]
    BlankSubdomain { domain: Domain },

    /// A subdomain appears more than once within its domain.
    #[error("subdomain {subdomain:?} is listed more than once in {domain}")]
    DuplicateSubdomain { domain: Domain, subdomain: String },

    /// A subdomain has no controls.
    #[error("subdomain {subdomain:?} in {domain} has no controls")]
    EmptySubdomain { domain: Domain, subdomain: String },

    /// A control identifier is blank.
    #[error("subdomain {subdomain:?} in {domain} has a blank control")]
    BlankControl { domain: Domain, subdomain: String },

    /// A control appears more than once within its subdomain.
    #[error("control {control:?} is listed more than once in {domain} / {subdomain}")]
    DuplicateControl {
        domain: Domain,
        subdomain: String,
        control: String,
    },
}
