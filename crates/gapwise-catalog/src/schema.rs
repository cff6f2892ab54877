//! Structural validation of catalog documents against the embedded
//! JSON Schema (Draft 2020-12).
//!
//! Schema validation runs before decoding so that a malformed custom
//! catalog is reported with JSON Pointer paths to every offending field
//! instead of the first serde error.

use serde_json::Value;

use crate::error::CatalogError;

/// The catalog JSON Schema, embedded at compile time.
pub const CATALOG_SCHEMA: &str = include_str!("../schema/catalog.schema.json");

/// Validate `document` against the catalog schema.
///
/// # Errors
///
/// Returns [`CatalogError::SchemaViolation`] listing every violation, or
/// [`CatalogError::SchemaCompile`] if the embedded schema is unusable.
pub fn validate_document(document: &Value) -> Result<(), CatalogError> {
    let schema: Value = serde_json::from_str(CATALOG_SCHEMA)?;

    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    let validator = opts
        .build(&schema)
        .map_err(|e| CatalogError::SchemaCompile(e.to_string()))?;

    let violations: Vec<String> = validator
        .iter_errors(document)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                format!("  (root): {e}")
            } else {
                format!("  {path}: {e}")
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::SchemaViolation { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_schema_is_valid_json() {
        let schema: Value = serde_json::from_str(CATALOG_SCHEMA).unwrap();
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn minimal_document_passes() {
        let doc = json!({
            "domains": [
                {"domain": "Governance", "subdomains": [{"name": "S", "controls": ["c"]}]}
            ]
        });
        validate_document(&doc).unwrap();
    }

    #[test]
    fn unknown_domain_reported_with_path() {
        let doc = json!({
            "domains": [
                {"domain": "Physical", "subdomains": []}
            ]
        });
        match validate_document(&doc) {
            Err(CatalogError::SchemaViolation { violations }) => {
                assert!(violations.iter().any(|v| v.contains("/domains/0/domain")));
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn missing_domains_reported_at_root() {
        match validate_document(&json!({"framework": "x"})) {
            Err(CatalogError::SchemaViolation { violations }) => {
                assert!(violations[0].contains("(root)"));
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn unexpected_fields_rejected() {
        let doc = json!({
            "domains": [
                {"domain": "Governance", "weight": 2, "subdomains": []}
            ]
        });
        assert!(validate_document(&doc).is_err());
    }
}
