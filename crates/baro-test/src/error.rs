//! Harness errors.

use crate::selector::SelectorError;
use baro_core::{FieldKind, FormError};
use thiserror::Error;

/// Error type for page interactions.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Selector could not be parsed
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// Selector matched no input
    #[error("no input matches '{0}'")]
    NotFound(String),

    /// Option is not in the dropdown
    #[error("option '{option}' not found in '{field}'")]
    OptionNotFound {
        /// Field name
        field: String,
        /// Requested option
        option: String,
    },

    /// Interaction does not apply to this kind of input
    #[error("cannot {action} '{field}': it is a {kind} input")]
    WrongKind {
        /// Field name
        field: String,
        /// Field kind
        kind: FieldKind,
        /// Attempted interaction
        action: &'static str,
    },

    /// Engine rejected the write
    #[error(transparent)]
    Form(#[from] FormError),
}
