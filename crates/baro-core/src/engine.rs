//! Form validation engine.
//!
//! Writes and validation are separate steps: [`FormValidationEngine::set_value`]
//! only stores (and clamps) a value, [`FormValidationEngine::validate_field`]
//! evaluates it on demand. Whoever drives the form decides when a field
//! counts as blurred.

use crate::error::FormError;
use crate::field::{FieldSpec, FieldValue};
use crate::state::FormState;
use crate::validation::{RegisteredEmails, ValidationContext, ValidationResult};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Per-field results of [`FormValidationEngine::validate_all`], in declared
/// field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    results: Vec<(String, ValidationResult)>,
}

impl ValidationReport {
    /// Result for one field.
    pub fn get(&self, name: &str) -> Option<&ValidationResult> {
        self.results
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, result)| result)
    }

    /// Iterate `(field, result)` pairs in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationResult)> {
        self.results
            .iter()
            .map(|(field, result)| (field.as_str(), result))
    }

    /// Names of the fields that failed.
    pub fn invalid_fields(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_invalid())
            .map(|(field, _)| field.clone())
            .collect()
    }

    /// Check if every field passed.
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_valid())
    }

    /// Number of fields reported.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the report is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for (field, result) in &self.results {
            map.serialize_entry(field, result)?;
        }
        map.end()
    }
}

/// Whether the form may be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// True iff every field is valid.
    pub can_submit: bool,
    /// Fields blocking submission, in declared order.
    pub invalid_fields: Vec<String>,
}

/// Holds the field specs of one form and the state of one form fill.
#[derive(Debug, Clone)]
pub struct FormValidationEngine {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    state: FormState,
    context: ValidationContext,
}

impl FormValidationEngine {
    /// Create an engine over a fixed, ordered set of fields.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, FormError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.name().to_string(), position).is_some() {
                return Err(FormError::DuplicateField(field.name().to_string()));
            }
        }
        tracing::debug!(fields = fields.len(), "form engine created");
        Ok(Self {
            fields,
            index,
            state: FormState::new(),
            context: ValidationContext::default(),
        })
    }

    /// Use this registered email snapshot.
    pub fn with_registered_emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.context.set_registered(emails.into_iter().collect());
        self
    }

    /// Evaluate age rules as of `today`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.context.set_today(today);
        self
    }

    /// Replace the registered email snapshot.
    pub fn set_registered_emails(&mut self, emails: RegisteredEmails) {
        tracing::debug!(count = emails.len(), "registered emails refreshed");
        self.context.set_registered(emails);
    }

    /// Data available to validators.
    pub const fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Field specs in declared order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field spec.
    pub fn field(&self, name: &str) -> Result<&FieldSpec, FormError> {
        self.index
            .get(name)
            .map(|&position| &self.fields[position])
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Current form state.
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Stored value of a field, `None` if never set.
    pub fn value(&self, name: &str) -> Result<Option<&FieldValue>, FormError> {
        self.field(name)?;
        Ok(self.state.get(name))
    }

    /// Store a value for one field.
    ///
    /// Text longer than the field's max length is truncated before storage.
    /// No validation happens here.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let field = self.field(name)?;
        let value = value.into();
        field.check_type(&value)?;

        let written = value.as_text().map(|text| text.chars().count());
        let stored = field.clamp(value);
        let kept = stored.as_text().map(|t| t.chars().count());
        if let (Some(written), Some(kept)) = (written, kept) {
            if written != kept {
                tracing::debug!(field = name, written, kept, "value clamped");
            }
        }
        tracing::debug!(field = name, kind = %field.kind(), "value set");
        self.state.set(name, stored);
        Ok(())
    }

    /// Return a field to its untouched state.
    pub fn clear_value(&mut self, name: &str) -> Result<(), FormError> {
        self.field(name)?;
        self.state.remove(name);
        Ok(())
    }

    /// Discard the whole form fill.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Validate one field against its current value.
    pub fn validate_field(&self, name: &str) -> Result<ValidationResult, FormError> {
        let field = self.field(name)?;
        let result = field.validate(self.state.get(name), &self.context);
        tracing::debug!(field = name, valid = result.is_valid(), "field validated");
        Ok(result)
    }

    /// Validate every field.
    pub fn validate_all(&self) -> ValidationReport {
        let results = self
            .fields
            .iter()
            .map(|field| {
                let result = field.validate(self.state.get(field.name()), &self.context);
                (field.name().to_string(), result)
            })
            .collect();
        ValidationReport { results }
    }

    /// Check whether the form may be submitted.
    pub fn can_submit(&self) -> AggregateResult {
        let report = self.validate_all();
        let invalid_fields = report.invalid_fields();
        if !invalid_fields.is_empty() {
            tracing::debug!(?invalid_fields, "submission blocked");
        }
        AggregateResult {
            can_submit: invalid_fields.is_empty(),
            invalid_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{EmailFormat, EmailNotRegistered, MinLength, MustBeTrue};

    fn engine() -> FormValidationEngine {
        FormValidationEngine::new(vec![
            FieldSpec::text("name")
                .required("Name is required")
                .rule(MinLength::with_message(5, "too short")),
            FieldSpec::text("email")
                .required("Email is required")
                .rule(EmailFormat::with_message("bad email"))
                .rule(EmailNotRegistered::with_message("taken")),
            FieldSpec::text("address").with_max_length(10),
            FieldSpec::checkbox("agreeTerms").rule(MustBeTrue::with_message("tick")),
        ])
        .unwrap()
        .with_registered_emails(["march@email.com"])
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = FormValidationEngine::new(vec![FieldSpec::text("a"), FieldSpec::text("a")])
            .unwrap_err();
        assert_eq!(err, FormError::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_unknown_field() {
        let mut engine = engine();
        assert_eq!(
            engine.set_value("nickname", "x"),
            Err(FormError::UnknownField("nickname".to_string()))
        );
        assert!(matches!(
            engine.validate_field("nickname"),
            Err(FormError::UnknownField(_))
        ));
        assert!(engine.value("nickname").is_err());
        assert!(engine.clear_value("nickname").is_err());
    }

    #[test]
    fn test_type_mismatch_leaves_state_untouched() {
        let mut engine = engine();
        let err = engine.set_value("agreeTerms", "yes").unwrap_err();
        assert!(matches!(err, FormError::TypeMismatch { .. }));
        assert!(engine.value("agreeTerms").unwrap().is_none());
    }

    #[test]
    fn test_set_value_does_not_validate() {
        let mut engine = engine();
        engine.set_value("name", "Jo").unwrap();
        assert_eq!(engine.value("name").unwrap(), Some(&FieldValue::from("Jo")));
        assert_eq!(engine.validate_field("name").unwrap().error(), Some("too short"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut engine = engine();
        engine.set_value("name", "Jo").unwrap();
        engine.set_value("name", "John Doe").unwrap();
        assert!(engine.validate_field("name").unwrap().is_valid());
    }

    #[test]
    fn test_clamp_on_write() {
        let mut engine = engine();
        engine.set_value("address", "0123456789abc").unwrap();
        assert_eq!(
            engine.value("address").unwrap(),
            Some(&FieldValue::from("0123456789"))
        );
    }

    #[test]
    fn test_registered_email_snapshot() {
        let mut engine = engine();
        engine.set_value("email", " MARCH@email.com").unwrap();
        assert_eq!(engine.validate_field("email").unwrap().error(), Some("taken"));

        engine.set_registered_emails(RegisteredEmails::new());
        assert!(engine.validate_field("email").unwrap().is_valid());
    }

    #[test]
    fn test_validate_all_in_declared_order() {
        let engine = engine();
        let report = engine.validate_all();
        let names: Vec<&str> = report.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "email", "address", "agreeTerms"]);
        assert_eq!(report.invalid_fields(), ["name", "email", "agreeTerms"]);
        assert!(report.get("address").unwrap().is_valid());
    }

    #[test]
    fn test_can_submit() {
        let mut engine = engine();
        assert!(!engine.can_submit().can_submit);

        engine.set_value("name", "John Doe").unwrap();
        engine.set_value("email", "newuser@example.com").unwrap();
        engine.set_value("agreeTerms", true).unwrap();
        let aggregate = engine.can_submit();
        assert!(aggregate.can_submit);
        assert!(aggregate.invalid_fields.is_empty());

        engine.clear_value("name").unwrap();
        assert_eq!(engine.can_submit().invalid_fields, ["name"]);
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        engine.set_value("name", "John Doe").unwrap();
        engine.reset();
        assert!(engine.state().is_empty());
        assert_eq!(
            engine.validate_field("name").unwrap().error(),
            Some("Name is required")
        );
    }

    #[test]
    fn test_report_serializes_in_order() {
        let engine = engine();
        let json = serde_json::to_string(&engine.validate_all()).unwrap();
        let name_pos = json.find("\"name\"").unwrap();
        let terms_pos = json.find("\"agreeTerms\"").unwrap();
        assert!(name_pos < terms_pos);

        let aggregate = serde_json::to_value(engine.can_submit()).unwrap();
        assert_eq!(aggregate["canSubmit"], false);
    }
}
