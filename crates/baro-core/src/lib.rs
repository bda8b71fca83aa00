//! Form validation engine for the Baro storefront.
//!
//! This crate provides:
//! - Field specifications: [`FieldSpec`], [`FieldKind`], [`FieldValue`]
//! - Validators: [`Validator`] and the built-in rules in [`validation`]
//! - The engine: [`FormValidationEngine`] with per-field and aggregate verdicts
//! - The registration form contract in [`registration`]
//!
//! ```
//! use baro_core::registration::{field, message, registration_engine};
//!
//! let mut engine = registration_engine(["Ontario"], ["Canada"], ["march@email.com"]).unwrap();
//! engine.set_value(field::NAME, "John").unwrap();
//! let result = engine.validate_field(field::NAME).unwrap();
//! assert_eq!(result.error(), Some(message::NAME_MIN_LENGTH));
//! assert!(!engine.can_submit().can_submit);
//! ```

mod engine;
mod error;
mod field;
pub mod registration;
mod state;
pub mod validation;

pub use engine::{AggregateResult, FormValidationEngine, ValidationReport};
pub use error::FormError;
pub use field::{FieldKind, FieldSpec, FieldValue};
pub use state::FormState;
pub use validation::{RegisteredEmails, ValidationContext, ValidationResult, Validator};
