//! Form-style validation result: error kind to offending value, empty when valid.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Named reasons a field can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationErrorKind {
    /// Value does not match the required pattern
    Pattern,
    /// Value is already taken in the space
    Duplicate,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErrorKind::Pattern => write!(f, "pattern"),
            ValidationErrorKind::Duplicate => write!(f, "duplicate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub value: String,
}

/// Result of validating one field; an empty map means the value is valid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<ValidationErrorKind, ErrorPayload>);

impl ValidationErrors {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn single(kind: ValidationErrorKind, value: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(
            kind,
            ErrorPayload {
                value: value.into(),
            },
        );
        Self(errors)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, kind: ValidationErrorKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn get(&self, kind: ValidationErrorKind) -> Option<&ErrorPayload> {
        self.0.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ValidationErrorKind> + '_ {
        self.0.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_serializes_to_empty_object() {
        let json = serde_json::to_string(&ValidationErrors::valid()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_pattern_error_shape() {
        let errors = ValidationErrors::single(ValidationErrorKind::Pattern, "ab");
        assert!(!errors.is_valid());
        assert!(errors.has(ValidationErrorKind::Pattern));
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"pattern":{"value":"ab"}}"#
        );
    }
}
