//! # Identifier Newtypes
//!
//! Each identifier is a distinct type: an [`AssessorId`] cannot be passed
//! where a [`ProjectId`] is expected.
//!
//! String identifiers are trimmed and validated at construction (non-empty,
//! at most [`MAX_IDENTIFIER_LEN`] characters). UUID identifiers are valid by
//! construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum length of a string identifier.
pub const MAX_IDENTIFIER_LEN: usize = 255;

fn validated(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let len = trimmed.chars().count();
    if len > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_IDENTIFIER_LEN,
            actual: len,
        });
    }
    Ok(trimmed.to_string())
}

/// Who performed an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssessorId(String);

impl AssessorId {
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the value is blank or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        validated("assessor_id", value.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssessorId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssessorId> for String {
    fn from(id: AssessorId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AssessorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which project an assessment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the value is blank or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        validated("project_id", value.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one assessment run (walker session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(Uuid);

impl AssessmentId {
    /// Create a new random assessment identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessor_id_trims_whitespace() {
        let id = AssessorId::new("  ciso@example.com ").unwrap();
        assert_eq!(id.as_str(), "ciso@example.com");
    }

    #[test]
    fn blank_identifiers_rejected() {
        assert_eq!(
            AssessorId::new("   "),
            Err(ValidationError::Empty {
                field: "assessor_id"
            })
        );
        assert_eq!(
            ProjectId::new(""),
            Err(ValidationError::Empty { field: "project_id" })
        );
    }

    #[test]
    fn oversized_identifier_rejected() {
        let long = "p".repeat(MAX_IDENTIFIER_LEN + 1);
        match ProjectId::new(long) {
            Err(ValidationError::TooLong { max, actual, .. }) => {
                assert_eq!(max, MAX_IDENTIFIER_LEN);
                assert_eq!(actual, MAX_IDENTIFIER_LEN + 1);
            }
            other => panic!("expected TooLong, got {other:?}"),
        }
    }

    #[test]
    fn serde_validates_on_deserialize() {
        assert!(serde_json::from_str::<ProjectId>("\"  \"").is_err());
        let id: ProjectId = serde_json::from_str("\"proj-7\"").unwrap();
        assert_eq!(id.as_str(), "proj-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"proj-7\"");
    }

    #[test]
    fn assessment_ids_are_unique() {
        assert_ne!(AssessmentId::new(), AssessmentId::new());
    }
}
