//! Page object for the registration form.
//!
//! Drives a [`FormValidationEngine`] the way a browser drives the page:
//! inputs are addressed by selector, focus moves with every interaction and
//! a field shows its error only after it has been blurred once.

use baro_core::registration::{field, registration_engine};
use baro_core::{FieldKind, FieldSpec, FieldValue, FormValidationEngine};
use baro_yaml::{Fixtures, FormManifest, ParseError};
use chrono::NaiveDate;
use std::collections::HashSet;

use crate::error::HarnessError;
use crate::fixture::{self, RegistrationData};
use crate::selector::Selector;

/// Result of pressing the register button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form was accepted
    Registered {
        /// Submitted email address
        email: String,
    },
    /// The button was disabled
    Blocked {
        /// Fields preventing submission, in page order
        invalid_fields: Vec<String>,
    },
}

impl SubmitOutcome {
    /// Check if the registration went through.
    pub const fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

/// Registration page backed by a validation engine.
#[derive(Debug)]
pub struct RegisterPage {
    /// Engine holding the form state
    engine: FormValidationEngine,
    /// Field that currently has focus
    focused: Option<String>,
    /// Fields blurred at least once
    touched: HashSet<String>,
}

impl RegisterPage {
    /// Wrap an engine.
    pub fn new(engine: FormValidationEngine) -> Self {
        Self {
            engine,
            focused: None,
            touched: HashSet::new(),
        }
    }

    /// Open the registration form with the storefront datasets.
    pub fn open() -> Result<Self, HarnessError> {
        let engine = registration_engine(
            fixture::province_names(),
            fixture::country_names(),
            fixture::SEEDED_EMAIL_ADDRESSES,
        )?;
        Ok(Self::new(engine))
    }

    /// Open a form described by a manifest.
    pub fn from_manifest(manifest: &FormManifest, fixtures: &Fixtures) -> Result<Self, ParseError> {
        Ok(Self::new(manifest.build_engine(fixtures)?))
    }

    /// Evaluate age rules as of `today`.
    #[must_use]
    pub fn with_today(self, today: NaiveDate) -> Self {
        Self {
            engine: self.engine.with_today(today),
            ..self
        }
    }

    /// Underlying engine.
    pub const fn engine(&self) -> &FormValidationEngine {
        &self.engine
    }

    // === Interactions ===

    /// Type into a text, password or date input, replacing its content.
    pub fn fill(&mut self, selector: &str, text: &str) -> Result<&mut Self, HarnessError> {
        let name = self.resolve_kind(selector, "fill", |kind| {
            matches!(kind, FieldKind::Text | FieldKind::Password | FieldKind::Date)
        })?;
        self.focus(&name);
        self.engine.set_value(&name, text)?;
        Ok(self)
    }

    /// Pick an option of a dropdown by its label.
    pub fn select_option(
        &mut self,
        selector: &str,
        option: &str,
    ) -> Result<&mut Self, HarnessError> {
        let name = self.resolve_kind(selector, "select", |kind| kind == FieldKind::Select)?;
        let spec = self.engine.field(&name)?;
        if !spec.options().iter().any(|o| o == option) {
            return Err(HarnessError::OptionNotFound {
                field: name,
                option: option.to_string(),
            });
        }
        self.focus(&name);
        self.engine.set_value(&name, option)?;
        Ok(self)
    }

    /// Tick a checkbox.
    pub fn check(&mut self, selector: &str) -> Result<&mut Self, HarnessError> {
        self.set_checked(selector, true, "check")
    }

    /// Untick a checkbox.
    pub fn uncheck(&mut self, selector: &str) -> Result<&mut Self, HarnessError> {
        self.set_checked(selector, false, "uncheck")
    }

    /// Click an input: focuses it and toggles checkboxes.
    pub fn click(&mut self, selector: &str) -> Result<&mut Self, HarnessError> {
        let name = self.resolve(selector)?;
        self.focus(&name);
        if self.engine.field(&name)?.kind() == FieldKind::Checkbox {
            let checked = self.checked(&name)?;
            self.engine.set_value(&name, !checked)?;
        }
        Ok(self)
    }

    /// Move focus away from the current input.
    pub fn blur(&mut self) -> &mut Self {
        if let Some(previous) = self.focused.take() {
            tracing::trace!(field = %previous, "blur");
            self.touched.insert(previous);
        }
        self
    }

    /// Fill the name input.
    pub fn fill_name(&mut self, name: &str) -> Result<&mut Self, HarnessError> {
        self.fill(field::NAME, name)
    }

    /// Fill the email input.
    pub fn fill_email(&mut self, email: &str) -> Result<&mut Self, HarnessError> {
        self.fill(field::EMAIL, email)
    }

    /// Fill the password input.
    pub fn fill_password(&mut self, password: &str) -> Result<&mut Self, HarnessError> {
        self.fill(field::PASSWORD, password)
    }

    /// Fill the phone input.
    pub fn fill_phone(&mut self, phone: &str) -> Result<&mut Self, HarnessError> {
        self.fill(field::PHONE, phone)
    }

    /// Fill the birthday input (`YYYY-MM-DD`).
    pub fn fill_birthday(&mut self, birthday: &str) -> Result<&mut Self, HarnessError> {
        self.fill(field::BIRTHDAY, birthday)
    }

    /// Fill the address input.
    pub fn fill_address(&mut self, address: &str) -> Result<&mut Self, HarnessError> {
        self.fill(field::ADDRESS, address)
    }

    /// Pick a province.
    pub fn select_province(&mut self, province: &str) -> Result<&mut Self, HarnessError> {
        self.select_option(field::PROVINCE, province)
    }

    /// Pick a country.
    pub fn select_country(&mut self, country: &str) -> Result<&mut Self, HarnessError> {
        self.select_option(field::COUNTRY, country)
    }

    /// Tick the terms checkbox.
    pub fn accept_terms(&mut self) -> Result<&mut Self, HarnessError> {
        self.check(field::AGREE_TERMS)
    }

    /// Tick the newsletter checkbox.
    pub fn subscribe_to_newsletter(&mut self) -> Result<&mut Self, HarnessError> {
        self.check(field::NEWSLETTER)
    }

    /// Press the register button.
    ///
    /// A blocked submit marks every field touched so all errors show.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.blur();
        let aggregate = self.engine.can_submit();
        if aggregate.can_submit {
            let email = self
                .engine
                .value(field::EMAIL)
                .ok()
                .flatten()
                .and_then(FieldValue::as_text)
                .unwrap_or_default()
                .to_string();
            tracing::info!(%email, "registration submitted");
            return SubmitOutcome::Registered { email };
        }

        self.touched
            .extend(self.engine.fields().iter().map(|f| f.name().to_string()));
        SubmitOutcome::Blocked {
            invalid_fields: aggregate.invalid_fields,
        }
    }

    /// Fill the whole form and submit it.
    pub fn register_user(
        &mut self,
        data: &RegistrationData,
    ) -> Result<SubmitOutcome, HarnessError> {
        self.fill_name(&data.name)?
            .fill_email(&data.email)?
            .fill_password(&data.password)?
            .fill_phone(&data.phone)?
            .fill_birthday(&data.birthday)?
            .fill_address(&data.address)?;
        if let Some(province) = &data.province {
            self.select_province(province)?;
        }
        if let Some(country) = &data.country {
            self.select_country(country)?;
        }
        if data.accept_terms {
            self.accept_terms()?;
        }
        if data.newsletter {
            self.subscribe_to_newsletter()?;
        }
        Ok(self.submit())
    }

    /// Forget all input, focus and touched state.
    pub fn reload(&mut self) -> &mut Self {
        self.engine.reset();
        self.focused = None;
        self.touched.clear();
        self
    }

    // === Queries ===

    /// Visible error text under an input.
    pub fn error_text(&self, selector: &str) -> Result<Option<String>, HarnessError> {
        let name = self.resolve(selector)?;
        if !self.touched.contains(&name) {
            return Ok(None);
        }
        let result = self.engine.validate_field(&name)?;
        Ok(result.error().map(ToString::to_string))
    }

    /// Current content of an input; empty for checkboxes and untouched inputs.
    pub fn input_value(&self, selector: &str) -> Result<String, HarnessError> {
        let name = self.resolve(selector)?;
        let value = self.engine.value(&name)?;
        Ok(value
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string())
    }

    /// Check if a checkbox is ticked.
    pub fn is_checked(&self, selector: &str) -> Result<bool, HarnessError> {
        let name = self.resolve(selector)?;
        self.checked(&name)
    }

    /// Check if an input has been blurred.
    pub fn is_touched(&self, selector: &str) -> Result<bool, HarnessError> {
        Ok(self.touched.contains(&self.resolve(selector)?))
    }

    /// Field that has focus.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Option labels of a dropdown, placeholder excluded.
    pub fn options(&self, selector: &str) -> Result<&[String], HarnessError> {
        let name = self.resolve(selector)?;
        Ok(self.engine.field(&name)?.options())
    }

    /// Option labels of the province dropdown.
    pub fn province_options(&self) -> &[String] {
        self.engine
            .field(field::PROVINCE)
            .map(FieldSpec::options)
            .unwrap_or_default()
    }

    /// Check if the register button is enabled.
    pub fn is_register_enabled(&self) -> bool {
        self.engine.can_submit().can_submit
    }

    // === Assertions ===

    /// Assert the error text under an input.
    ///
    /// # Panics
    ///
    /// Panics if no error is shown or it differs from `expected`.
    pub fn assert_error(&self, selector: &str, expected: &str) -> &Self {
        let actual = self.query(selector, Self::error_text);
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "Expected error '{expected}' for '{selector}' but got {actual:?}"
        );
        self
    }

    /// Assert that an input shows no error.
    ///
    /// # Panics
    ///
    /// Panics if an error is shown.
    pub fn assert_no_error(&self, selector: &str) -> &Self {
        let actual = self.query(selector, Self::error_text);
        assert!(
            actual.is_none(),
            "Expected no error for '{selector}' but got {actual:?}"
        );
        self
    }

    /// Assert the content of an input.
    ///
    /// # Panics
    ///
    /// Panics if the value differs.
    pub fn assert_value(&self, selector: &str, expected: &str) -> &Self {
        let actual = self.query(selector, Self::input_value);
        assert_eq!(
            actual, expected,
            "Expected value '{expected}' but got '{actual}' for '{selector}'"
        );
        self
    }

    /// Assert the register button state.
    ///
    /// # Panics
    ///
    /// Panics if the button state differs.
    pub fn assert_register_enabled(&self, expected: bool) -> &Self {
        let aggregate = self.engine.can_submit();
        assert_eq!(
            aggregate.can_submit, expected,
            "Expected register button enabled={expected}, invalid fields: {:?}",
            aggregate.invalid_fields
        );
        self
    }

    // === Internals ===

    fn query<T>(&self, selector: &str, f: impl Fn(&Self, &str) -> Result<T, HarnessError>) -> T {
        f(self, selector).unwrap_or_else(|e| panic!("Query '{selector}' failed: {e}"))
    }

    fn resolve(&self, selector: &str) -> Result<String, HarnessError> {
        let sel = Selector::parse(selector)?;
        self.engine
            .fields()
            .iter()
            .find(|spec| sel.matches(spec))
            .map(|spec| spec.name().to_string())
            .ok_or_else(|| HarnessError::NotFound(selector.to_string()))
    }

    fn resolve_kind(
        &self,
        selector: &str,
        action: &'static str,
        accepts: impl Fn(FieldKind) -> bool,
    ) -> Result<String, HarnessError> {
        let name = self.resolve(selector)?;
        let kind = self.engine.field(&name)?.kind();
        if accepts(kind) {
            Ok(name)
        } else {
            Err(HarnessError::WrongKind {
                field: name,
                kind,
                action,
            })
        }
    }

    fn set_checked(
        &mut self,
        selector: &str,
        checked: bool,
        action: &'static str,
    ) -> Result<&mut Self, HarnessError> {
        let name = self.resolve_kind(selector, action, FieldKind::is_boolean)?;
        self.focus(&name);
        self.engine.set_value(&name, checked)?;
        Ok(self)
    }

    fn checked(&self, name: &str) -> Result<bool, HarnessError> {
        Ok(self
            .engine
            .value(name)?
            .and_then(FieldValue::as_bool)
            .unwrap_or(false))
    }

    fn focus(&mut self, name: &str) {
        if self.focused.as_deref() == Some(name) {
            return;
        }
        self.blur();
        self.focused = Some(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baro_core::registration::message;

    fn page() -> RegisterPage {
        RegisterPage::open()
            .unwrap()
            .with_today(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap())
    }

    #[test]
    fn test_error_hidden_until_blur() {
        let mut page = page();
        page.fill_name("John").unwrap();
        assert_eq!(page.error_text("name").unwrap(), None);
        assert_eq!(page.focused(), Some("name"));

        page.blur();
        assert_eq!(
            page.error_text("name").unwrap().as_deref(),
            Some(message::NAME_MIN_LENGTH)
        );
    }

    #[test]
    fn test_focus_moves_on_fill() {
        let mut page = page();
        page.fill_name("").unwrap().fill_email("a@b.co").unwrap();
        assert!(page.is_touched("name").unwrap());
        assert!(!page.is_touched("email").unwrap());
        assert_eq!(page.focused(), Some("email"));
    }

    #[test]
    fn test_refocus_same_field_keeps_untouched() {
        let mut page = page();
        page.fill_name("Jo").unwrap().fill_name("Joh").unwrap();
        assert!(!page.is_touched("name").unwrap());
    }

    #[test]
    fn test_selectors_resolve_by_test_id() {
        let mut page = page();
        page.fill("[data-testid='bday']", "1990-01-01").unwrap();
        assert_eq!(page.input_value("#bday").unwrap(), "1990-01-01");
        assert_eq!(page.input_value("birthday").unwrap(), "1990-01-01");
    }

    #[test]
    fn test_unknown_selector() {
        let page = page();
        assert!(matches!(page.input_value("#zip"), Err(HarnessError::NotFound(_))));
        assert!(matches!(page.input_value("!"), Err(HarnessError::Selector(_))));
    }

    #[test]
    fn test_wrong_kind() {
        let mut page = page();
        let err = page.fill("terms", "yes").unwrap_err();
        assert!(matches!(err, HarnessError::WrongKind { action: "fill", .. }));
        let err = page.check("email").unwrap_err();
        assert!(matches!(err, HarnessError::WrongKind { kind: FieldKind::Text, .. }));
        let err = page.select_option("name", "Ontario").unwrap_err();
        assert!(matches!(err, HarnessError::WrongKind { .. }));
    }

    #[test]
    fn test_option_not_found() {
        let mut page = page();
        let err = page.select_province("Atlantis").unwrap_err();
        assert!(matches!(
            err,
            HarnessError::OptionNotFound { ref field, ref option }
                if field == "province" && option == "Atlantis"
        ));
        assert_eq!(page.input_value("province").unwrap(), "");
    }

    #[test]
    fn test_malformed_date_rejected() {
        let mut page = page();
        let err = page.fill_birthday("01/01/1990").unwrap_err();
        assert!(matches!(err, HarnessError::Form(_)));
    }

    #[test]
    fn test_click_toggles_checkbox() {
        let mut page = page();
        page.click("#terms").unwrap();
        assert!(page.is_checked("terms").unwrap());
        page.click("#terms").unwrap();
        assert!(!page.is_checked("terms").unwrap());
        page.click("name").unwrap();
        assert_eq!(
            page.error_text("agreeTerms").unwrap().as_deref(),
            Some(message::TERMS)
        );
    }

    #[test]
    fn test_blocked_submit_touches_everything() {
        let mut page = page();
        let outcome = page.submit();
        assert!(!outcome.is_registered());
        for spec in page.engine().fields() {
            assert!(page.is_touched(spec.name()).unwrap());
        }
        page.assert_error("email", message::EMAIL_REQUIRED)
            .assert_no_error("newsletter");
    }

    #[test]
    fn test_reload_clears_state() {
        let mut page = page();
        page.register_user(&RegistrationData::valid()).unwrap();
        page.reload();
        assert_eq!(page.input_value("name").unwrap(), "");
        assert!(!page.is_touched("name").unwrap());
        assert_eq!(page.focused(), None);
        page.assert_register_enabled(false);
    }

    #[test]
    #[should_panic(expected = "Expected error")]
    fn test_assert_error_panics() {
        let mut page = page();
        page.fill_name("John Doe").unwrap().blur();
        page.assert_error("name", message::NAME_REQUIRED);
    }
}
