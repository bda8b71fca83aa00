//! Field specifications and field values.

use crate::error::FormError;
use crate::validation::{parse_date, ValidationContext, ValidationResult, Validator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Kind of input a field represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text input.
    Text,
    /// Masked text input.
    Password,
    /// ISO `YYYY-MM-DD` date input.
    Date,
    /// Dropdown with an injected option list.
    Select,
    /// Boolean checkbox.
    Checkbox,
}

impl FieldKind {
    /// Lowercase name used in messages and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Date => "date",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
        }
    }

    /// Check if the field holds a boolean.
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Checkbox)
    }

    /// Value of a field that was never set.
    pub fn default_value(self) -> FieldValue {
        if self.is_boolean() {
            FieldValue::Bool(false)
        } else {
            FieldValue::Text(String::new())
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Bool(bool),
    /// Text, date or selected option.
    Text(String),
}

impl FieldValue {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bool(_) => None,
        }
    }

    /// Boolean state, if this is a checkbox value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(checked) => Some(*checked),
            Self::Text(_) => None,
        }
    }

    /// Blank text or an unticked checkbox.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Bool(checked) => !checked,
        }
    }

    /// Short description of the value's type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bool(_) => "boolean",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for FieldValue {
    fn from(checked: bool) -> Self {
        Self::Bool(checked)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Bool(checked) => write!(f, "{checked}"),
        }
    }
}

/// Static description of one form field.
///
/// Built with the `text`/`password`/`date`/`select`/`checkbox` constructors
/// and the builder methods below. Rules run in the order they were added.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: Option<String>,
    rules: Vec<Arc<dyn Validator>>,
    max_length: Option<usize>,
    options: Vec<String>,
    test_id: Option<String>,
    label: Option<String>,
}

impl FieldSpec {
    /// Create a field of the given kind.
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: None,
            rules: Vec::new(),
            max_length: None,
            options: Vec::new(),
            test_id: None,
            label: None,
        }
    }

    /// Free text field.
    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Password field.
    pub fn password(name: &str) -> Self {
        Self::new(name, FieldKind::Password)
    }

    /// Date field.
    pub fn date(name: &str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Dropdown field.
    pub fn select(name: &str) -> Self {
        Self::new(name, FieldKind::Select)
    }

    /// Checkbox field.
    pub fn checkbox(name: &str) -> Self {
        Self::new(name, FieldKind::Checkbox)
    }

    /// Mark the field required, reporting `message` when blank.
    pub fn required(mut self, message: &str) -> Self {
        self.required = Some(message.to_string());
        self
    }

    /// Append a rule.
    pub fn rule<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.rules.push(Arc::new(validator));
        self
    }

    /// Append an already shared rule.
    pub fn rule_shared(mut self, validator: Arc<dyn Validator>) -> Self {
        self.rules.push(validator);
        self
    }

    /// Cap stored text at `max` characters.
    pub const fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set the selectable options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the `data-testid` the input is rendered with.
    pub fn with_test_id(mut self, test_id: &str) -> Self {
        self.test_id = Some(test_id.to_string());
        self
    }

    /// Set the display label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind.
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Check if the field is required.
    pub const fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Message reported when a required field is blank.
    pub fn required_message(&self) -> Option<&str> {
        self.required.as_deref()
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Arc<dyn Validator>] {
        &self.rules
    }

    /// Write-time length cap.
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Selectable options, empty for non-select fields.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Test id, falling back to the field name.
    pub fn test_id(&self) -> &str {
        self.test_id.as_deref().unwrap_or(&self.name)
    }

    /// Display label, falling back to the field name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Reject values that do not fit this field's kind.
    pub fn check_type(&self, value: &FieldValue) -> Result<(), FormError> {
        let mismatch = |found: String| FormError::TypeMismatch {
            field: self.name.clone(),
            expected: self.kind,
            found,
        };
        match (self.kind, value) {
            (FieldKind::Checkbox, FieldValue::Bool(_))
            | (
                FieldKind::Text | FieldKind::Password | FieldKind::Select,
                FieldValue::Text(_),
            ) => Ok(()),
            (FieldKind::Date, FieldValue::Text(text)) => {
                if text.trim().is_empty() || parse_date(text).is_some() {
                    Ok(())
                } else {
                    Err(mismatch(format!("unparseable date '{text}'")))
                }
            }
            (_, other) => Err(mismatch(other.type_name().to_string())),
        }
    }

    /// Apply the write-time length cap.
    pub fn clamp(&self, value: FieldValue) -> FieldValue {
        match (self.max_length, value) {
            (Some(max), FieldValue::Text(text)) if text.chars().count() > max => {
                FieldValue::Text(text.chars().take(max).collect())
            }
            (_, value) => value,
        }
    }

    /// Validate a value against this field.
    ///
    /// `None` means the field was never set. The required check runs first;
    /// after it the first failing rule wins.
    pub fn validate(
        &self,
        value: Option<&FieldValue>,
        ctx: &ValidationContext,
    ) -> ValidationResult {
        let value = value.map_or_else(|| Cow::Owned(self.kind.default_value()), Cow::Borrowed);
        let blank = value.is_blank();

        if let Some(message) = &self.required {
            if blank {
                return ValidationResult::Invalid(message.clone());
            }
        } else if blank && !self.kind.is_boolean() {
            return ValidationResult::Valid;
        }

        for rule in &self.rules {
            let result = rule.validate(&value, ctx);
            tracing::trace!(
                field = %self.name,
                rule = rule.name(),
                valid = result.is_valid(),
                "rule evaluated"
            );
            if result.is_invalid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}
