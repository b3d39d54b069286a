//! Error types for schema derivation and payload validation.
//!
//! Two distinct failure families live here:
//!
//! - [`SchemaError`]: the schema itself is malformed (unresolvable type,
//!   cyclic nesting, duplicate property). Fatal, raised synchronously from
//!   rule derivation, never retried.
//! - [`ValidationErrors`]: the payload fails the derived rules. Not an error
//!   of the engine — it is the expected [`Verdict::Fail`] payload, organized
//!   by dotted field path with one entry per failed rule atom.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// Schema Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// A malformed or ambiguous schema declaration.
///
/// Derivation either fully succeeds producing a complete rule mapping, or
/// fails fast with one of these before any validation occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A property declares no resolvable type.
    #[error("property `{property}` on `{dto}` has no resolvable type")]
    UnresolvedType { dto: String, property: String },

    /// Nested DTO references form a cycle.
    #[error("cyclic schema reference: {chain}")]
    CyclicSchema { chain: String },

    /// Schema nesting exceeds the configured depth limit.
    #[error("schema nesting exceeds depth limit {limit} at `{path}`")]
    DepthExceeded { limit: usize, path: String },

    /// Two properties resolve to the same input name.
    #[error("duplicate property `{property}` on `{dto}`")]
    DuplicateProperty { dto: String, property: String },

    /// A custom rule override normalized to an empty atom sequence.
    #[error("custom rule for `{path}` normalized to an empty rule set")]
    EmptyRule { path: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Error Kinds
// ═══════════════════════════════════════════════════════════════════════════════

/// The kind of rule violation that occurred on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Field is required but was missing, null, or empty.
    Required,
    /// Field key must be present in the payload.
    MustBePresent,
    /// Value has the wrong shape for its declared type.
    WrongType { expected: String },
    /// Value size (length, magnitude, item count) is below the minimum.
    TooSmall { min: String, actual: String },
    /// Value size exceeds the maximum.
    TooLarge { max: String, actual: String },
    /// Value does not match the expected pattern.
    Pattern { pattern: String },
    /// Value is not in the allowed set.
    NotInSet { allowed: Vec<String> },
    /// Custom rule failed.
    Custom { code: String },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::MustBePresent => write!(f, "field must be present"),
            Self::WrongType { expected } => write!(f, "must be a {}", expected),
            Self::TooSmall { min, actual } => {
                write!(f, "must be at least {} (got {})", min, actual)
            }
            Self::TooLarge { max, actual } => {
                write!(f, "must be at most {} (got {})", max, actual)
            }
            Self::Pattern { pattern } => write!(f, "must match pattern: {}", pattern),
            Self::NotInSet { allowed } => {
                write!(f, "must be one of: {}", allowed.join(", "))
            }
            Self::Custom { code } => write!(f, "validation failed: {}", code),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Field Error
// ═══════════════════════════════════════════════════════════════════════════════

/// A single rule violation for a specific field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The kind of violation.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl FieldError {
    /// Create a new field error with the kind's default message.
    pub fn new(kind: ValidationErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Create a new field error with a custom message.
    pub fn with_message(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Validation Errors Collection
// ═══════════════════════════════════════════════════════════════════════════════

/// A collection of rule violations organized by field path.
///
/// Paths are dotted, with concrete indices for collection elements
/// (e.g. `"parent.name"`, `"items.0.sku"`). Insertion order is preserved so
/// error reports follow rule-mapping order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: IndexMap<String, Vec<FieldError>>,
}

impl ValidationErrors {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of errors across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }

    /// Number of field paths with errors.
    pub fn field_count(&self) -> usize {
        self.errors.len()
    }

    /// Add an error for a field path.
    pub fn add(&mut self, path: impl Into<String>, error: FieldError) {
        self.errors.entry(path.into()).or_default().push(error);
    }

    /// Add an error with just the kind (auto-generates the message).
    pub fn add_error(&mut self, path: impl Into<String>, kind: ValidationErrorKind) {
        self.add(path, FieldError::new(kind));
    }

    /// Get errors for a specific field path.
    pub fn get(&self, path: &str) -> Option<&Vec<FieldError>> {
        self.errors.get(path)
    }

    /// Check if a specific field path has errors.
    pub fn has_errors(&self, path: &str) -> bool {
        self.errors.get(path).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// All field paths that have errors, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.errors.keys()
    }

    /// Iterate over all errors.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<FieldError>)> {
        self.errors.iter()
    }

    /// Convert to a simple map of path -> error messages.
    pub fn to_message_map(&self) -> IndexMap<String, Vec<String>> {
        self.errors
            .iter()
            .map(|(path, errors)| {
                (
                    path.clone(),
                    errors.iter().map(|e| e.message.clone()).collect(),
                )
            })
            .collect()
    }

    /// The first error, if any (useful for simple error displays).
    pub fn first_error(&self) -> Option<(&String, &FieldError)> {
        self.errors
            .iter()
            .next()
            .and_then(|(path, errors)| errors.first().map(|error| (path, error)))
    }

    /// Flatten to a list of `path: message` strings.
    pub fn to_flat_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(path, errors)| {
                errors.iter().map(move |e| format!("{}: {}", path, e.message))
            })
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_flat_messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = (String, Vec<FieldError>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<FieldError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Verdict
// ═══════════════════════════════════════════════════════════════════════════════

/// The outcome of running a rule mapping against a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every rule passed.
    Pass,
    /// At least one rule failed; violations keyed by field path.
    Fail(ValidationErrors),
}

impl Verdict {
    /// True if the payload passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The violations, if any.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(errors) => Some(errors),
        }
    }

    /// Convert to a `Result`, moving the violations into the `Err` arm.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        match self {
            Verdict::Pass => Ok(()),
            Verdict::Fail(errors) => Err(errors),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::UnresolvedType {
            dto: "UserDto".into(),
            property: "name".into(),
        };
        assert_eq!(
            err.to_string(),
            "property `name` on `UserDto` has no resolvable type"
        );

        let err = SchemaError::CyclicSchema {
            chain: "A -> B -> A".into(),
        };
        assert!(err.to_string().contains("A -> B -> A"));

        let err = SchemaError::DepthExceeded {
            limit: 32,
            path: "a.b.c".into(),
        };
        assert!(err.to_string().contains("32"));
        assert!(err.to_string().contains("a.b.c"));
    }

    #[test]
    fn test_field_error_display() {
        let error = FieldError::new(ValidationErrorKind::Required);
        assert_eq!(error.to_string(), "field is required");

        let error = FieldError::new(ValidationErrorKind::WrongType {
            expected: "string".into(),
        });
        assert_eq!(error.to_string(), "must be a string");
    }

    #[test]
    fn test_error_kind_display_all_variants() {
        assert_eq!(
            ValidationErrorKind::MustBePresent.to_string(),
            "field must be present"
        );
        assert_eq!(
            ValidationErrorKind::TooSmall {
                min: "5".into(),
                actual: "3".into()
            }
            .to_string(),
            "must be at least 5 (got 3)"
        );
        assert_eq!(
            ValidationErrorKind::TooLarge {
                max: "10".into(),
                actual: "12".into()
            }
            .to_string(),
            "must be at most 10 (got 12)"
        );
        assert!(ValidationErrorKind::Pattern {
            pattern: r"\d+".into()
        }
        .to_string()
        .contains(r"\d+"));
        assert!(ValidationErrorKind::NotInSet {
            allowed: vec!["a".into(), "b".into()]
        }
        .to_string()
        .contains("a, b"));
        assert!(ValidationErrorKind::Custom { code: "branch".into() }
            .to_string()
            .contains("branch"));
    }

    #[test]
    fn test_validation_errors_add_and_get() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", ValidationErrorKind::Required);
        errors.add_error(
            "name",
            ValidationErrorKind::TooSmall {
                min: "2".into(),
                actual: "1".into(),
            },
        );

        assert_eq!(errors.field_count(), 2);
        assert_eq!(errors.error_count(), 2);
        assert!(errors.has_errors("email"));
        assert!(errors.has_errors("name"));
        assert!(!errors.has_errors("other"));
    }

    #[test]
    fn test_validation_errors_multiple_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add_error("name", ValidationErrorKind::Required);
        errors.add_error(
            "name",
            ValidationErrorKind::WrongType {
                expected: "string".into(),
            },
        );
        assert_eq!(errors.field_count(), 1);
        assert_eq!(errors.error_count(), 2);
        assert_eq!(errors.get("name").unwrap().len(), 2);
    }

    #[test]
    fn test_validation_errors_preserve_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.add_error("zeta", ValidationErrorKind::Required);
        errors.add_error("alpha", ValidationErrorKind::Required);
        let fields: Vec<_> = errors.fields().cloned().collect();
        assert_eq!(fields, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn test_validation_errors_first_error() {
        let mut errors = ValidationErrors::new();
        errors.add_error("first_field", ValidationErrorKind::Required);
        let (path, error) = errors.first_error().unwrap();
        assert_eq!(path, "first_field");
        assert_eq!(error.kind, ValidationErrorKind::Required);
    }

    #[test]
    fn test_validation_errors_display_and_flat_messages() {
        let mut errors = ValidationErrors::new();
        errors.add_error("name", ValidationErrorKind::Required);
        errors.add_error(
            "items.0.sku",
            ValidationErrorKind::WrongType {
                expected: "string".into(),
            },
        );
        let messages = errors.to_flat_messages();
        assert_eq!(messages.len(), 2);
        assert!(errors.to_string().contains("items.0.sku"));
    }

    #[test]
    fn test_validation_errors_to_message_map() {
        let mut errors = ValidationErrors::new();
        errors.add_error("name", ValidationErrorKind::Required);
        let map = errors.to_message_map();
        assert_eq!(map.get("name").unwrap(), &vec!["field is required".to_string()]);
    }

    #[test]
    fn test_verdict_into_result() {
        assert!(Verdict::Pass.into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add_error("x", ValidationErrorKind::Required);
        let verdict = Verdict::Fail(errors);
        assert!(!verdict.is_pass());
        assert!(verdict.errors().is_some());
        assert!(verdict.into_result().is_err());
    }

    #[test]
    fn test_validation_errors_serialize_flat() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", ValidationErrorKind::Required);
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json.get("email").is_some());
    }
}
