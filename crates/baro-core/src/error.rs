//! Error types for baro-core.
//!
//! Only caller mistakes are errors. A field that fails its rules is reported
//! as [`ValidationResult::Invalid`](crate::ValidationResult::Invalid).

use crate::field::FieldKind;
use thiserror::Error;

/// Errors raised by [`FormValidationEngine`](crate::FormValidationEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The field name is not part of the form.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The value does not fit the field's kind.
    #[error("type mismatch for '{field}': expected {expected}, got {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared kind of the field
        expected: FieldKind,
        /// Description of the rejected value
        found: String,
    },

    /// Two field specs share a name.
    #[error("duplicate field: {0}")]
    DuplicateField(String),
}
