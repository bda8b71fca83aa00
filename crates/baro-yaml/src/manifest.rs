//! YAML form manifests.

use crate::error::ParseError;
use crate::fixtures::Fixtures;
use baro_core::validation::{
    AllOf, EmailFormat, EmailNotRegistered, EqualsValue, MinLength, MinimumAge, MustBeTrue,
    Pattern,
};
use baro_core::{FieldKind, FieldSpec, FormValidationEngine, Validator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const REGISTRATION_YAML: &str = include_str!("../forms/registration.yaml");

/// Form manifest loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormManifest {
    /// Form name
    pub name: String,
    /// Fields in on-page order
    pub fields: Vec<FieldConfig>,
}

/// Field configuration from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name
    pub name: String,
    /// Input kind
    pub kind: FieldKind,
    /// Required message; absent for optional fields
    #[serde(default)]
    pub required: Option<String>,
    /// `data-testid` of the input
    #[serde(default)]
    pub test_id: Option<String>,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Write-time length cap
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Inline option list
    #[serde(default)]
    pub options: Vec<String>,
    /// Option list taken from fixtures
    #[serde(default)]
    pub options_from: Option<OptionsSource>,
    /// Rules in evaluation order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Fixture dataset used to populate a dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsSource {
    /// Province display names
    Provinces,
    /// Country display names
    Countries,
}

/// Rule configuration from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleConfig {
    /// Trimmed length of at least `min` characters
    MinLength {
        /// Minimum character count
        min: usize,
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Letters and spaces only
    LettersAndSpaces {
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Exactly `count` digits
    Digits {
        /// Digit count
        count: usize,
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Letters, digits, spaces, `#` and `-`
    Address {
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Regular expression matched against the whole value
    Pattern {
        /// Regular expression
        regex: String,
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Email syntax
    Email {
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Not among the registered emails
    NotRegistered {
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Date at least `years` ago
    MinimumAge {
        /// Age in years
        years: u32,
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Exactly this value
    Equals {
        /// Expected value
        value: String,
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Checkbox ticked
    MustBeTrue {
        /// Error message
        #[serde(default)]
        message: Option<String>,
    },
    /// Every check passes; one shared message
    AllOf {
        /// Shared error message
        #[serde(default)]
        message: Option<String>,
        /// Inner checks
        checks: Vec<RuleConfig>,
    },
}

impl RuleConfig {
    /// Configured message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::MinLength { message, .. }
            | Self::LettersAndSpaces { message }
            | Self::Digits { message, .. }
            | Self::Address { message }
            | Self::Pattern { message, .. }
            | Self::Email { message }
            | Self::NotRegistered { message }
            | Self::MinimumAge { message, .. }
            | Self::Equals { message, .. }
            | Self::MustBeTrue { message }
            | Self::AllOf { message, .. } => message.as_deref(),
        }
    }

    /// Compile into a validator.
    ///
    /// `inherited` is used when the rule has no message of its own; inner
    /// checks of `all_of` inherit the shared message.
    fn build(
        &self,
        field: &str,
        path: &str,
        inherited: Option<&str>,
    ) -> Result<Arc<dyn Validator>, ParseError> {
        let message = self
            .message()
            .or(inherited)
            .ok_or_else(|| ParseError::MissingField(format!("{path}.message")))?;

        let validator: Arc<dyn Validator> = match self {
            Self::MinLength { min, .. } => Arc::new(MinLength::with_message(*min, message)),
            Self::LettersAndSpaces { .. } => Arc::new(Pattern::letters_and_spaces(message)),
            Self::Digits { count, .. } => Arc::new(Pattern::digits(*count, message)),
            Self::Address { .. } => Arc::new(Pattern::address(message)),
            Self::Pattern { regex, .. } => {
                let pattern =
                    Pattern::regex(regex, message).map_err(|e| ParseError::InvalidValue {
                        field: field.to_string(),
                        message: e.to_string(),
                    })?;
                Arc::new(pattern)
            }
            Self::Email { .. } => Arc::new(EmailFormat::with_message(message)),
            Self::NotRegistered { .. } => Arc::new(EmailNotRegistered::with_message(message)),
            Self::MinimumAge { years, .. } => Arc::new(MinimumAge::with_message(*years, message)),
            Self::Equals { value, .. } => Arc::new(EqualsValue::with_message(value, message)),
            Self::MustBeTrue { .. } => Arc::new(MustBeTrue::with_message(message)),
            Self::AllOf { checks, .. } => {
                if checks.is_empty() {
                    return Err(ParseError::InvalidValue {
                        field: field.to_string(),
                        message: "all_of needs at least one check".to_string(),
                    });
                }
                let mut combined = AllOf::with_message(message);
                for (index, check) in checks.iter().enumerate() {
                    let path = format!("{path}.checks[{index}]");
                    let inner = check.build(field, &path, Some(message))?;
                    combined = combined.check_shared(inner);
                }
                Arc::new(combined)
            }
        };
        Ok(validator)
    }
}

impl FieldConfig {
    /// Compile into a field spec, resolving option lists against `fixtures`.
    pub fn to_spec(&self, fixtures: &Fixtures) -> Result<FieldSpec, ParseError> {
        let mut spec = FieldSpec::new(&self.name, self.kind);
        if let Some(message) = &self.required {
            spec = spec.required(message);
        }
        if let Some(test_id) = &self.test_id {
            spec = spec.with_test_id(test_id);
        }
        if let Some(label) = &self.label {
            spec = spec.with_label(label);
        }
        if let Some(max) = self.max_length {
            if max == 0 {
                return Err(ParseError::InvalidValue {
                    field: self.name.clone(),
                    message: "max_length must be positive".to_string(),
                });
            }
            spec = spec.with_max_length(max);
        }

        let options = match self.options_from {
            Some(_) if !self.options.is_empty() => {
                return Err(ParseError::InvalidValue {
                    field: self.name.clone(),
                    message: "use either options or options_from".to_string(),
                });
            }
            Some(OptionsSource::Provinces) => fixtures.province_names(),
            Some(OptionsSource::Countries) => fixtures.country_names(),
            None => self.options.clone(),
        };
        if !options.is_empty() {
            if self.kind != FieldKind::Select {
                return Err(ParseError::InvalidValue {
                    field: self.name.clone(),
                    message: format!(
                        "options are only allowed on select fields, not {}",
                        self.kind
                    ),
                });
            }
            spec = spec.with_options(options);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            let path = format!("fields[{}].rules[{index}]", self.name);
            spec = spec.rule_shared(rule.build(&self.name, &path, None)?);
        }
        Ok(spec)
    }
}

impl FormManifest {
    /// Parse manifest from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        if manifest.fields.is_empty() {
            return Err(ParseError::MissingField("fields".to_string()));
        }
        Ok(manifest)
    }

    /// Serialize manifest to YAML string.
    pub fn to_yaml(&self) -> Result<String, ParseError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// The storefront registration form.
    pub fn registration() -> Result<Self, ParseError> {
        Self::from_yaml(REGISTRATION_YAML)
    }

    /// Look up a field configuration.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Compile every field.
    pub fn field_specs(&self, fixtures: &Fixtures) -> Result<Vec<FieldSpec>, ParseError> {
        self.fields.iter().map(|f| f.to_spec(fixtures)).collect()
    }

    /// Build an engine; seeded emails become the registered snapshot.
    pub fn build_engine(&self, fixtures: &Fixtures) -> Result<FormValidationEngine, ParseError> {
        let mut engine = FormValidationEngine::new(self.field_specs(fixtures)?)?;
        engine.set_registered_emails(fixtures.registered_emails());
        tracing::info!(form = %self.name, fields = self.fields.len(), "form manifest compiled");
        Ok(engine)
    }
}
