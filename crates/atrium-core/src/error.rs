//! # Error Types
//!
//! Domain-level error types for atrium-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  atrium-core errors (this file)                                        │
//! │  ├── ValidationError  - Request rejected before any storage call       │
//! │  └── RegistryError    - Bad table configuration                        │
//! │                                                                         │
//! │  atrium-db errors (separate crate)                                     │
//! │  └── StoreError       - AlreadyExists / NotFound / Unavailable / ...   │
//! │                                                                         │
//! │  portal-api errors (in app)                                            │
//! │  └── ApiError         - JSON envelope with HTTP status + code          │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → ApiError → Frontend              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Validation failures carry the full `{field, message}` list so the UI
//!    can render them next to the offending inputs
//! 3. Errors are typed, never bare strings

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Field Error
// =============================================================================

/// A single validation failure, tied to the field that caused it.
///
/// ## Serialization
/// This is what API clients receive inside a rejected request:
/// ```json
/// { "field": "subject", "message": "subject is required" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// The offending request field (camelCase, as it appears on the wire).
    pub field: String,

    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A rejected request: one or more fields failed their checks.
///
/// Validation runs before the data-access layer is reached, so a
/// `ValidationError` guarantees no write was attempted.
#[derive(Debug, Clone, Error)]
#[error("validation failed: {}", join_fields(.errors))]
pub struct ValidationError {
    /// Every violation found, in field order. Never empty.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates a validation error from a non-empty list of field errors.
    pub fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        ValidationError { errors }
    }

    /// Convenience constructor for a single-field rejection.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Registry Error
// =============================================================================

/// Table registry configuration errors.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A physical table name override is not a valid SQL identifier.
    ///
    /// Physical names are interpolated into statements (they cannot be bound
    /// as parameters), so anything outside `[A-Za-z_][A-Za-z0-9_]*` is
    /// rejected at startup rather than at query time.
    #[error("invalid physical table name for {logical}: '{value}'")]
    InvalidTableName { logical: String, value: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_message() {
        let err = FieldError::new("subject", "subject is required");
        assert_eq!(err.to_string(), "subject: subject is required");
    }

    #[test]
    fn test_validation_error_joins_fields() {
        let err = ValidationError::new(vec![
            FieldError::new("subject", "subject is required"),
            FieldError::new("priority", "priority must be one of: [\"Low\", \"High\"]"),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("validation failed: subject"));
        assert!(msg.contains("; priority:"));
    }

    #[test]
    fn test_field_error_serializes_flat() {
        let err = FieldError::new("email", "email has invalid format");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["field"], "email");
        assert_eq!(json["message"], "email has invalid format");
    }
}
