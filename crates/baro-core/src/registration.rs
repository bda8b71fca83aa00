//! The storefront registration form.
//!
//! Field names, test ids and messages match what the storefront renders.
//! Province and country options are data supplied by the caller.

use crate::engine::FormValidationEngine;
use crate::error::FormError;
use crate::field::FieldSpec;
use crate::validation::{
    AllOf, EmailFormat, EmailNotRegistered, EqualsValue, MinLength, MinimumAge, MustBeTrue,
    Pattern,
};

/// Field names.
pub mod field {
    /// Full name.
    pub const NAME: &str = "name";
    /// Email address.
    pub const EMAIL: &str = "email";
    /// Password.
    pub const PASSWORD: &str = "password";
    /// Phone number.
    pub const PHONE: &str = "phone";
    /// Date of birth.
    pub const BIRTHDAY: &str = "birthday";
    /// Street address.
    pub const ADDRESS: &str = "address";
    /// Province dropdown.
    pub const PROVINCE: &str = "province";
    /// Country dropdown.
    pub const COUNTRY: &str = "country";
    /// Terms of service checkbox.
    pub const AGREE_TERMS: &str = "agreeTerms";
    /// Newsletter opt-in checkbox.
    pub const NEWSLETTER: &str = "newsletter";
}

/// User-facing messages.
pub mod message {
    pub const NAME_REQUIRED: &str = "Name is required";
    pub const NAME_MIN_LENGTH: &str =
        "Input does not meet the minimum length requirement - 5 chars";
    pub const NAME_PATTERN: &str = "Input should be letters and spaces only";
    pub const EMAIL_REQUIRED: &str = "Email is required";
    pub const EMAIL_FORMAT: &str = "Invalid email format";
    pub const EMAIL_REGISTERED: &str = "This email address is already registered";
    pub const PASSWORD_REQUIRED: &str = "Password is required";
    pub const PASSWORD_MIN_LENGTH: &str = "Password required minimum of 6 chars";
    pub const PHONE_REQUIRED: &str = "Phone number is required";
    pub const PHONE_PATTERN: &str = "Phone number should a 10 digit phone number";
    pub const BIRTHDAY_REQUIRED: &str = "Birthday is required";
    pub const UNDER_AGE: &str = "You must be at least 18 years old";
    pub const ADDRESS_REQUIRED: &str = "Address is required";
    pub const ADDRESS_PATTERN: &str =
        "Requires min of 5 chars (letters, numbers, spaces, # and - )";
    pub const PROVINCE_REQUIRED: &str = "Province is required";
    pub const COUNTRY_REQUIRED: &str = "Country is required";
    pub const COUNTRY_CANADA: &str = "Country should be set to Canada";
    pub const TERMS: &str = "Please tick the box to proceed";
}

/// Address input cap.
pub const ADDRESS_MAX_LENGTH: usize = 100;
/// Minimum age to register.
pub const MINIMUM_AGE: u32 = 18;
/// The only country accepted.
pub const REQUIRED_COUNTRY: &str = "Canada";

/// Field specs of the registration form, in on-page order.
pub fn registration_form<P, C>(provinces: P, countries: C) -> Vec<FieldSpec>
where
    P: IntoIterator,
    P::Item: Into<String>,
    C: IntoIterator,
    C::Item: Into<String>,
{
    vec![
        FieldSpec::text(field::NAME)
            .required(message::NAME_REQUIRED)
            .rule(MinLength::with_message(5, message::NAME_MIN_LENGTH))
            .rule(Pattern::letters_and_spaces(message::NAME_PATTERN))
            .with_label("Name"),
        FieldSpec::text(field::EMAIL)
            .required(message::EMAIL_REQUIRED)
            .rule(EmailFormat::with_message(message::EMAIL_FORMAT))
            .rule(EmailNotRegistered::with_message(message::EMAIL_REGISTERED))
            .with_label("Email"),
        FieldSpec::password(field::PASSWORD)
            .required(message::PASSWORD_REQUIRED)
            .rule(MinLength::with_message(6, message::PASSWORD_MIN_LENGTH))
            .with_label("Password"),
        FieldSpec::text(field::PHONE)
            .required(message::PHONE_REQUIRED)
            .rule(Pattern::digits(10, message::PHONE_PATTERN))
            .with_label("Phone"),
        FieldSpec::date(field::BIRTHDAY)
            .required(message::BIRTHDAY_REQUIRED)
            .rule(MinimumAge::with_message(MINIMUM_AGE, message::UNDER_AGE))
            .with_test_id("bday")
            .with_label("Birthday"),
        FieldSpec::text(field::ADDRESS)
            .required(message::ADDRESS_REQUIRED)
            .rule(
                AllOf::with_message(message::ADDRESS_PATTERN)
                    .check(MinLength::new(5))
                    .check(Pattern::address(message::ADDRESS_PATTERN)),
            )
            .with_max_length(ADDRESS_MAX_LENGTH)
            .with_label("Address"),
        FieldSpec::select(field::PROVINCE)
            .required(message::PROVINCE_REQUIRED)
            .with_options(provinces)
            .with_label("Province"),
        FieldSpec::select(field::COUNTRY)
            .required(message::COUNTRY_REQUIRED)
            .rule(EqualsValue::with_message(REQUIRED_COUNTRY, message::COUNTRY_CANADA))
            .with_options(countries)
            .with_label("Country"),
        FieldSpec::checkbox(field::AGREE_TERMS)
            .rule(MustBeTrue::with_message(message::TERMS))
            .with_test_id("terms")
            .with_label("I agree to the terms"),
        FieldSpec::checkbox(field::NEWSLETTER).with_label("Subscribe to newsletter"),
    ]
}

/// Engine over the registration form.
pub fn registration_engine<P, C, E>(
    provinces: P,
    countries: C,
    registered_emails: E,
) -> Result<FormValidationEngine, FormError>
where
    P: IntoIterator,
    P::Item: Into<String>,
    C: IntoIterator,
    C::Item: Into<String>,
    E: IntoIterator,
    E::Item: AsRef<str>,
{
    Ok(FormValidationEngine::new(registration_form(provinces, countries))?
        .with_registered_emails(registered_emails))
}
