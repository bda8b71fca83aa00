//! Test data for the registration form.
//!
//! Mirrors `baro-yaml/fixtures/storefront.yaml` as compile-time constants so
//! scenario tests can reference individual records.
//!
//! # Example
//!
//! ```
//! use baro_test::fixture::{is_seeded_email, province_names, SEEDED_EMAIL_ADDRESSES};
//!
//! assert_eq!(province_names()[0], "Newfoundland and Labrador");
//! assert!(is_seeded_email(&SEEDED_EMAIL_ADDRESSES[0].to_uppercase()));
//! ```

use baro_core::RegisteredEmails;
use baro_yaml::{Country, Fixtures, Province, Region};

/// A province record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvinceData {
    /// Two-letter postal code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Region
    pub region: Region,
}

/// A country record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryData {
    /// ISO 3166 alpha-2 code
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Dialing prefix
    pub dial_code: &'static str,
}

const fn province(code: &'static str, name: &'static str, region: Region) -> ProvinceData {
    ProvinceData { code, name, region }
}

/// Provinces and territories in dropdown order.
pub const PROVINCES: [ProvinceData; 13] = [
    province("NL", "Newfoundland and Labrador", Region::Atlantic),
    province("PE", "Prince Edward Island", Region::Atlantic),
    province("NS", "Nova Scotia", Region::Atlantic),
    province("NB", "New Brunswick", Region::Atlantic),
    province("QC", "Quebec", Region::Central),
    province("ON", "Ontario", Region::Central),
    province("MB", "Manitoba", Region::Prairies),
    province("SK", "Saskatchewan", Region::Prairies),
    province("AB", "Alberta", Region::Prairies),
    province("BC", "British Columbia", Region::Pacific),
    province("YT", "Yukon", Region::Northern),
    province("NT", "Northwest Territories", Region::Northern),
    province("NU", "Nunavut", Region::Northern),
];

/// Countries in dropdown order.
pub const COUNTRIES: [CountryData; 2] = [
    CountryData {
        code: "CA",
        name: "Canada",
        dial_code: "+1",
    },
    CountryData {
        code: "US",
        name: "United States",
        dial_code: "+1",
    },
];

/// Addresses that already have an account.
pub const SEEDED_EMAIL_ADDRESSES: [&str; 3] =
    ["january@email.com", "march@email.com", "april@email.com"];

/// Province display names.
pub fn province_names() -> Vec<&'static str> {
    PROVINCES.iter().map(|p| p.name).collect()
}

/// Province codes.
pub fn province_codes() -> Vec<&'static str> {
    PROVINCES.iter().map(|p| p.code).collect()
}

/// Country display names.
pub fn country_names() -> Vec<&'static str> {
    COUNTRIES.iter().map(|c| c.name).collect()
}

/// Country codes.
pub fn country_codes() -> Vec<&'static str> {
    COUNTRIES.iter().map(|c| c.code).collect()
}

/// Check an address against the seeded accounts, ignoring case and
/// surrounding whitespace.
pub fn is_seeded_email(email: &str) -> bool {
    let normalized = RegisteredEmails::normalize(email);
    SEEDED_EMAIL_ADDRESSES.iter().any(|seeded| *seeded == normalized)
}

/// The constants as a [`Fixtures`] value.
pub fn fixtures() -> Fixtures {
    Fixtures {
        provinces: PROVINCES
            .iter()
            .map(|p| Province {
                code: p.code.to_string(),
                name: p.name.to_string(),
                region: p.region,
            })
            .collect(),
        countries: COUNTRIES
            .iter()
            .map(|c| Country {
                code: c.code.to_string(),
                name: c.name.to_string(),
                dial_code: c.dial_code.to_string(),
            })
            .collect(),
        seeded_emails: SEEDED_EMAIL_ADDRESSES.iter().map(ToString::to_string).collect(),
    }
}

/// One registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationData {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Phone number
    pub phone: String,
    /// Birth date, `YYYY-MM-DD`
    pub birthday: String,
    /// Street address
    pub address: String,
    /// Province to select, `None` leaves the placeholder
    pub province: Option<String>,
    /// Country to select, `None` leaves the placeholder
    pub country: Option<String>,
    /// Tick the terms checkbox
    pub accept_terms: bool,
    /// Tick the newsletter checkbox
    pub newsletter: bool,
}

impl RegistrationData {
    /// A new user that passes every rule.
    pub fn valid() -> Self {
        Self {
            name: "John Doe".to_string(),
            email: "newuser@example.com".to_string(),
            password: "password123".to_string(),
            phone: "1234567890".to_string(),
            birthday: "1990-01-01".to_string(),
            address: "123 Main Street".to_string(),
            province: Some(PROVINCES[5].name.to_string()),
            country: Some(COUNTRIES[0].name.to_string()),
            accept_terms: true,
            newsletter: false,
        }
    }

    /// Use another email address.
    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    /// Use another birth date.
    #[must_use]
    pub fn with_birthday(mut self, birthday: &str) -> Self {
        self.birthday = birthday.to_string();
        self
    }

    /// Set the terms checkbox.
    #[must_use]
    pub const fn with_terms(mut self, accept: bool) -> Self {
        self.accept_terms = accept;
        self
    }

    /// Set the newsletter checkbox.
    #[must_use]
    pub const fn with_newsletter(mut self, subscribe: bool) -> Self {
        self.newsletter = subscribe;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_storefront_yaml() {
        assert_eq!(fixtures(), Fixtures::storefront().unwrap());
    }

    #[test]
    fn test_names_and_codes() {
        assert_eq!(province_names().len(), 13);
        assert_eq!(province_codes()[12], "NU");
        assert_eq!(country_names(), ["Canada", "United States"]);
        assert_eq!(country_codes(), ["CA", "US"]);
    }

    #[test]
    fn test_is_seeded_email() {
        assert!(is_seeded_email("april@email.com"));
        assert!(is_seeded_email(" January@EMAIL.com\t"));
        assert!(!is_seeded_email("may@email.com"));
        assert!(!is_seeded_email(""));
    }

    #[test]
    fn test_valid_registration_data() {
        let data = RegistrationData::valid();
        assert_eq!(data.province.as_deref(), Some("Ontario"));
        assert!(!is_seeded_email(&data.email));

        let data = data.with_email("march@email.com").with_terms(false);
        assert!(is_seeded_email(&data.email));
        assert!(!data.accept_terms);
    }
}
