//! Error types for YAML parsing.

use baro_core::FormError;
use thiserror::Error;

/// Error type for manifest and fixture parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The parsed fields do not form a valid form
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}
