//! Declarative validators for registration form fields.
//!
//! This module provides:
//! - [`ValidationResult`], the per-field verdict
//! - The [`Validator`] trait and the built-in validators (min length,
//!   pattern, email format, registered email lookup, minimum age, fixed
//!   value, checkbox ticked, combined checks)
//! - [`ValidationContext`], the read-only data validators may consult

use crate::field::FieldValue;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Date format accepted by date fields (`<input type="date">` value format).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation result for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Validation passed.
    Valid,
    /// Validation failed with an error message.
    Invalid(String),
}

impl ValidationResult {
    /// Check if validation passed.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check if validation failed.
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Get the error message if invalid.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Invalid(msg) => Some(msg),
            Self::Valid => None,
        }
    }

    fn invalid(message: &str) -> Self {
        Self::Invalid(message.to_string())
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("ValidationResult", 2)?;
        out.serialize_field("valid", &self.is_valid())?;
        match self.error() {
            Some(message) => out.serialize_field("errorMessage", message)?,
            None => out.skip_field("errorMessage")?,
        }
        out.end()
    }
}

/// Emails that already have an account, normalized by trim + lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredEmails {
    emails: HashSet<String>,
}

impl RegisteredEmails {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize an address the way lookups compare it.
    pub fn normalize(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Add an address.
    pub fn insert(&mut self, email: &str) {
        self.emails.insert(Self::normalize(email));
    }

    /// Check whether the address is already registered.
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&Self::normalize(email))
    }

    /// Number of registered addresses.
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Check if no address is registered.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for RegisteredEmails {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for email in iter {
            set.insert(email.as_ref());
        }
        set
    }
}

/// Read-only data available to validators at evaluation time.
///
/// Without a pinned date, age checks use the local date at the moment they run.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    registered: RegisteredEmails,
    today: Option<NaiveDate>,
}

impl ValidationContext {
    /// Create a context pinned to the given evaluation date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            registered: RegisteredEmails::new(),
            today: Some(today),
        }
    }

    /// Create a context that follows the local clock.
    pub fn local() -> Self {
        Self::default()
    }

    /// Replace the registered email snapshot.
    pub fn with_registered(mut self, registered: RegisteredEmails) -> Self {
        self.registered = registered;
        self
    }

    /// Registered email snapshot.
    pub const fn registered(&self) -> &RegisteredEmails {
        &self.registered
    }

    /// Evaluation date used for age checks.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Pinned evaluation date, if any.
    pub const fn pinned_today(&self) -> Option<NaiveDate> {
        self.today
    }

    pub(crate) fn set_registered(&mut self, registered: RegisteredEmails) {
        self.registered = registered;
    }

    pub(crate) fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }
}

/// A validator that checks one field value.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validate the given value.
    fn validate(&self, value: &FieldValue, ctx: &ValidationContext) -> ValidationResult;

    /// Get the name of this validator.
    fn name(&self) -> &str;

    /// Message reported when the check fails.
    fn message(&self) -> &str;
}

/// Minimum length validator (trimmed, counted in characters).
#[derive(Debug, Clone)]
pub struct MinLength {
    min: usize,
    message: String,
}

impl MinLength {
    /// Create a min length validator.
    pub fn new(min: usize) -> Self {
        Self {
            min,
            message: format!("Must be at least {min} characters"),
        }
    }

    /// Create with custom message.
    pub fn with_message(min: usize, message: &str) -> Self {
        Self {
            min,
            message: message.to_string(),
        }
    }

    /// Minimum character count.
    pub const fn min(&self) -> usize {
        self.min
    }
}

impl Validator for MinLength {
    fn validate(&self, value: &FieldValue, _ctx: &ValidationContext) -> ValidationResult {
        match value.as_text() {
            Some(text) if text.trim().chars().count() >= self.min => ValidationResult::Valid,
            _ => ValidationResult::invalid(&self.message),
        }
    }

    fn name(&self) -> &'static str {
        "minLength"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Pattern validator. The whole value must match.
#[derive(Debug, Clone)]
pub struct Pattern {
    pattern: PatternType,
    message: String,
}

/// Type of pattern to match.
#[derive(Debug, Clone)]
pub enum PatternType {
    /// ASCII letters and spaces.
    LettersAndSpaces,
    /// Exactly this many ASCII digits.
    Digits(usize),
    /// Street address characters: letters, digits, spaces, `#` and `-`.
    Address,
    /// Regular expression, anchored at both ends.
    Regex(Regex),
}

impl Pattern {
    /// Letters and spaces only.
    pub fn letters_and_spaces(message: &str) -> Self {
        Self {
            pattern: PatternType::LettersAndSpaces,
            message: message.to_string(),
        }
    }

    /// Exactly `count` digits.
    pub fn digits(count: usize, message: &str) -> Self {
        Self {
            pattern: PatternType::Digits(count),
            message: message.to_string(),
        }
    }

    /// Street address charset.
    pub fn address(message: &str) -> Self {
        Self {
            pattern: PatternType::Address,
            message: message.to_string(),
        }
    }

    /// Compile a regular expression that must match the whole value.
    pub fn regex(pattern: &str, message: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            pattern: PatternType::Regex(anchored),
            message: message.to_string(),
        })
    }

    /// The pattern kind.
    pub const fn pattern(&self) -> &PatternType {
        &self.pattern
    }

    fn matches(&self, value: &str) -> bool {
        match &self.pattern {
            PatternType::LettersAndSpaces => {
                value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
            }
            PatternType::Digits(count) => {
                value.chars().count() == *count && value.chars().all(|c| c.is_ascii_digit())
            }
            PatternType::Address => value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '#' | '-')),
            PatternType::Regex(re) => re.is_match(value),
        }
    }
}

impl Validator for Pattern {
    fn validate(&self, value: &FieldValue, _ctx: &ValidationContext) -> ValidationResult {
        match value.as_text() {
            Some(text) if self.matches(text) => ValidationResult::Valid,
            _ => ValidationResult::invalid(&self.message),
        }
    }

    fn name(&self) -> &'static str {
        "pattern"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Email syntax validator.
#[derive(Debug, Clone)]
pub struct EmailFormat {
    message: String,
}

impl EmailFormat {
    /// Create with custom message.
    pub fn with_message(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn matches(value: &str) -> bool {
        let value = value.trim();
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains("..")
    }
}

impl Validator for EmailFormat {
    fn validate(&self, value: &FieldValue, _ctx: &ValidationContext) -> ValidationResult {
        match value.as_text() {
            Some(text) if Self::matches(text) => ValidationResult::Valid,
            _ => ValidationResult::invalid(&self.message),
        }
    }

    fn name(&self) -> &'static str {
        "email"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Rejects addresses found in the context's registered email snapshot.
#[derive(Debug, Clone)]
pub struct EmailNotRegistered {
    message: String,
}

impl EmailNotRegistered {
    /// Create with custom message.
    pub fn with_message(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Validator for EmailNotRegistered {
    fn validate(&self, value: &FieldValue, ctx: &ValidationContext) -> ValidationResult {
        match value.as_text() {
            Some(text) if !ctx.registered().contains(text) => ValidationResult::Valid,
            _ => ValidationResult::invalid(&self.message),
        }
    }

    fn name(&self) -> &'static str {
        "notRegistered"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Whole years elapsed between `birth` and `today`.
///
/// Negative when `birth` lies in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Parse a date field value.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Minimum age validator over an ISO date value.
#[derive(Debug, Clone)]
pub struct MinimumAge {
    years: u32,
    message: String,
}

impl MinimumAge {
    /// Create with custom message.
    pub fn with_message(years: u32, message: &str) -> Self {
        Self {
            years,
            message: message.to_string(),
        }
    }

    /// Required age in years.
    pub const fn years(&self) -> u32 {
        self.years
    }
}

impl Validator for MinimumAge {
    fn validate(&self, value: &FieldValue, ctx: &ValidationContext) -> ValidationResult {
        let old_enough = value
            .as_text()
            .and_then(parse_date)
            .is_some_and(|birth| i64::from(age_on(birth, ctx.today())) >= i64::from(self.years));
        if old_enough {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(&self.message)
        }
    }

    fn name(&self) -> &'static str {
        "minimumAge"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Value must equal a fixed string exactly.
#[derive(Debug, Clone)]
pub struct EqualsValue {
    expected: String,
    message: String,
}

impl EqualsValue {
    /// Create with custom message.
    pub fn with_message(expected: &str, message: &str) -> Self {
        Self {
            expected: expected.to_string(),
            message: message.to_string(),
        }
    }

    /// The required value.
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl Validator for EqualsValue {
    fn validate(&self, value: &FieldValue, _ctx: &ValidationContext) -> ValidationResult {
        if value.as_text() == Some(self.expected.as_str()) {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(&self.message)
        }
    }

    fn name(&self) -> &'static str {
        "equals"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Checkbox must be ticked.
#[derive(Debug, Clone)]
pub struct MustBeTrue {
    message: String,
}

impl MustBeTrue {
    /// Create with custom message.
    pub fn with_message(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl Validator for MustBeTrue {
    fn validate(&self, value: &FieldValue, _ctx: &ValidationContext) -> ValidationResult {
        if value.as_bool() == Some(true) {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(&self.message)
        }
    }

    fn name(&self) -> &'static str {
        "mustBeTrue"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Several checks reported under one shared message.
///
/// The messages of the inner validators are never shown.
#[derive(Debug, Clone)]
pub struct AllOf {
    checks: Vec<Arc<dyn Validator>>,
    message: String,
}

impl AllOf {
    /// Create an empty combined check.
    pub fn with_message(message: &str) -> Self {
        Self {
            checks: Vec::new(),
            message: message.to_string(),
        }
    }

    /// Add a check.
    pub fn check<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.checks.push(Arc::new(validator));
        self
    }

    /// Add an already shared check.
    pub fn check_shared(mut self, validator: Arc<dyn Validator>) -> Self {
        self.checks.push(validator);
        self
    }

    /// Inner checks in order.
    pub fn checks(&self) -> &[Arc<dyn Validator>] {
        &self.checks
    }
}

impl Validator for AllOf {
    fn validate(&self, value: &FieldValue, ctx: &ValidationContext) -> ValidationResult {
        if self
            .checks
            .iter()
            .all(|check| check.validate(value, ctx).is_valid())
        {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(&self.message)
        }
    }

    fn name(&self) -> &'static str {
        "allOf"
    }

    fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ValidationContext {
        ValidationContext::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap())
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    // ValidationResult tests
    #[test]
    fn test_validation_result_valid() {
        let result = ValidationResult::Valid;
        assert!(result.is_valid());
        assert!(!result.is_invalid());
        assert!(result.error().is_none());
    }

    #[test]
    fn test_validation_result_invalid() {
        let result = ValidationResult::Invalid("Error message".to_string());
        assert!(!result.is_valid());
        assert!(result.is_invalid());
        assert_eq!(result.error(), Some("Error message"));
    }

    #[test]
    fn test_validation_result_serializes_message_only_when_invalid() {
        let valid = serde_json::to_value(ValidationResult::Valid).unwrap();
        assert_eq!(valid["valid"], true);
        assert!(valid.get("errorMessage").is_none());

        let invalid = serde_json::to_value(ValidationResult::Invalid("bad".into())).unwrap();
        assert_eq!(invalid["valid"], false);
        assert_eq!(invalid["errorMessage"], "bad");
    }

    #[test]
    fn test_report_omits_message_for_valid_fields() {
        let json = serde_json::to_string(&ValidationResult::Valid).unwrap();
        assert_eq!(json, r#"{"valid":true}"#);
    }

    // ValidationContext tests
    #[test]
    fn test_context_pinned_date() {
        let context = ctx();
        assert_eq!(context.pinned_today(), NaiveDate::from_ymd_opt(2025, 6, 15));
        assert_eq!(context.today(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn test_context_follows_local_clock() {
        let context = ValidationContext::local();
        assert!(context.pinned_today().is_none());
        let before = Local::now().date_naive();
        let today = context.today();
        let after = Local::now().date_naive();
        assert!(before <= today && today <= after);
    }

    #[test]
    fn test_minimum_age_unpinned_uses_current_date() {
        let validator = MinimumAge::with_message(18, "too young");
        let context = ValidationContext::local();
        let today = Local::now().date_naive();
        let just_born = today.format(DATE_FORMAT).to_string();
        assert!(validator.validate(&text(&just_born), &context).is_invalid());
        assert!(validator.validate(&text("1950-01-01"), &context).is_valid());
    }

    // RegisteredEmails tests
    #[test]
    fn test_registered_emails_normalizes() {
        let emails: RegisteredEmails = ["March@Email.com ", "april@email.com"]
            .into_iter()
            .collect();
        assert_eq!(emails.len(), 2);
        assert!(emails.contains("march@email.com"));
        assert!(emails.contains("  APRIL@EMAIL.COM"));
        assert!(!emails.contains("may@email.com"));
    }

    // MinLength tests
    #[test]
    fn test_min_length_validator() {
        let validator = MinLength::new(5);
        assert_eq!(validator.name(), "minLength");

        assert!(validator.validate(&text("John Doe"), &ctx()).is_valid());
        assert!(validator.validate(&text("abcde"), &ctx()).is_valid());
        assert!(validator.validate(&text("John"), &ctx()).is_invalid());
        assert!(validator.validate(&text("  ab   "), &ctx()).is_invalid());
    }

    #[test]
    fn test_min_length_unicode() {
        let validator = MinLength::new(3);
        assert!(validator.validate(&text("日本語"), &ctx()).is_valid());
        assert!(validator.validate(&text("日本"), &ctx()).is_invalid());
    }

    #[test]
    fn test_min_length_custom_message() {
        let validator = MinLength::with_message(6, "Password required minimum of 6 chars");
        let result = validator.validate(&text("12345"), &ctx());
        assert_eq!(result.error(), Some("Password required minimum of 6 chars"));
    }

    // Pattern tests
    #[test]
    fn test_pattern_letters_and_spaces() {
        let validator = Pattern::letters_and_spaces("letters only");
        assert!(validator.validate(&text("John Doe"), &ctx()).is_valid());
        assert!(validator.validate(&text("John123@#$"), &ctx()).is_invalid());
        assert!(validator.validate(&text("Jean-Luc"), &ctx()).is_invalid());
    }

    #[test]
    fn test_pattern_digits() {
        let validator = Pattern::digits(10, "ten digits");
        assert!(validator.validate(&text("1234567890"), &ctx()).is_valid());
        assert!(validator.validate(&text("123456789"), &ctx()).is_invalid());
        assert!(validator.validate(&text("12345678901"), &ctx()).is_invalid());
        assert!(validator.validate(&text("123-456-78"), &ctx()).is_invalid());
    }

    #[test]
    fn test_pattern_address() {
        let validator = Pattern::address("address");
        assert!(validator.validate(&text("123 Main Street #456-B"), &ctx()).is_valid());
        assert!(validator.validate(&text("123 Main St @ Building"), &ctx()).is_invalid());
    }

    #[test]
    fn test_pattern_regex_is_anchored() {
        let validator = Pattern::regex("[A-Z]\\d[A-Z] \\d[A-Z]\\d", "postal code").unwrap();
        assert!(validator.validate(&text("K1A 0B1"), &ctx()).is_valid());
        assert!(validator.validate(&text("x K1A 0B1"), &ctx()).is_invalid());
        assert!(validator.validate(&text("K1A 0B1 x"), &ctx()).is_invalid());
    }

    #[test]
    fn test_pattern_regex_invalid() {
        assert!(Pattern::regex("(unclosed", "msg").is_err());
    }

    #[test]
    fn test_pattern_rejects_boolean() {
        let validator = Pattern::letters_and_spaces("letters only");
        assert!(validator.validate(&FieldValue::Bool(true), &ctx()).is_invalid());
    }

    // EmailFormat tests
    #[test]
    fn test_email_format() {
        let validator = EmailFormat::with_message("Invalid email format");
        assert_eq!(validator.name(), "email");

        assert!(validator.validate(&text("test@example.com"), &ctx()).is_valid());
        assert!(validator.validate(&text("user.name@domain.co.uk"), &ctx()).is_valid());

        assert!(validator.validate(&text("invalid-email"), &ctx()).is_invalid());
        assert!(validator.validate(&text("@missing.com"), &ctx()).is_invalid());
        assert!(validator.validate(&text("missing@"), &ctx()).is_invalid());
        assert!(validator.validate(&text("missing@.com"), &ctx()).is_invalid());
        assert!(validator.validate(&text("two@@example.com"), &ctx()).is_invalid());
        assert!(validator.validate(&text("sp ace@example.com"), &ctx()).is_invalid());
    }

    // EmailNotRegistered tests
    #[test]
    fn test_email_not_registered() {
        let registered: RegisteredEmails = ["january@email.com"].into_iter().collect();
        let context = ctx().with_registered(registered);
        let validator = EmailNotRegistered::with_message("taken");

        assert!(validator.validate(&text(" January@Email.com "), &context).is_invalid());
        assert!(validator.validate(&text("newuser@example.com"), &context).is_valid());
    }

    // MinimumAge tests
    #[test]
    fn test_age_on_birthday_boundary() {
        let birth = NaiveDate::from_ymd_opt(2007, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()), 17);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 18);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()), -8);
    }

    #[test]
    fn test_minimum_age() {
        let validator = MinimumAge::with_message(18, "too young");
        assert!(validator.validate(&text("1990-01-01"), &ctx()).is_valid());
        assert!(validator.validate(&text("2007-06-15"), &ctx()).is_valid());
        assert!(validator.validate(&text("2007-06-16"), &ctx()).is_invalid());
        assert!(validator.validate(&text("2008-01-01"), &ctx()).is_invalid());
        assert!(validator.validate(&text("not a date"), &ctx()).is_invalid());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("1990-01-01"),
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );
        assert!(parse_date("01/01/1990").is_none());
        assert!(parse_date("1990-02-30").is_none());
    }

    // EqualsValue tests
    #[test]
    fn test_equals_value() {
        let validator = EqualsValue::with_message("Canada", "Country should be set to Canada");
        assert_eq!(validator.expected(), "Canada");
        assert!(validator.validate(&text("Canada"), &ctx()).is_valid());
        assert!(validator.validate(&text("United States"), &ctx()).is_invalid());
        assert!(validator.validate(&text("canada"), &ctx()).is_invalid());
    }

    // MustBeTrue tests
    #[test]
    fn test_must_be_true() {
        let validator = MustBeTrue::with_message("tick");
        assert!(validator.validate(&FieldValue::Bool(true), &ctx()).is_valid());
        assert_eq!(
            validator.validate(&FieldValue::Bool(false), &ctx()).error(),
            Some("tick")
        );
    }

    // AllOf tests
    #[test]
    fn test_all_of_shares_message() {
        let validator = AllOf::with_message("shared")
            .check(MinLength::new(5))
            .check(Pattern::address("inner"));
        assert_eq!(validator.checks().len(), 2);

        assert!(validator.validate(&text("123 Main Street"), &ctx()).is_valid());
        assert_eq!(validator.validate(&text("123"), &ctx()).error(), Some("shared"));
        assert_eq!(
            validator.validate(&text("123 Main St @ Building"), &ctx()).error(),
            Some("shared")
        );
    }
}
