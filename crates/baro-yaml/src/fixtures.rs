//! Reference datasets: provinces, countries and seeded accounts.

use crate::error::ParseError;
use baro_core::RegisteredEmails;
use serde::{Deserialize, Serialize};

const STOREFRONT_YAML: &str = include_str!("../fixtures/storefront.yaml");

/// Canadian region a province belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// NL, PE, NS, NB
    Atlantic,
    /// QC, ON
    Central,
    /// MB, SK, AB
    Prairies,
    /// BC
    Pacific,
    /// YT, NT, NU
    Northern,
}

/// A province or territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    /// Two-letter postal code
    pub code: String,
    /// Display name
    pub name: String,
    /// Region
    pub region: Region,
}

/// A country offered at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166 alpha-2 code
    pub code: String,
    /// Display name
    pub name: String,
    /// International dialing prefix
    pub dial_code: String,
}

/// Fixture datasets for one test environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    /// Provinces in dropdown order
    #[serde(default)]
    pub provinces: Vec<Province>,
    /// Countries in dropdown order
    #[serde(default)]
    pub countries: Vec<Country>,
    /// Addresses that already have an account
    #[serde(default)]
    pub seeded_emails: Vec<String>,
}

impl Fixtures {
    /// Parse fixtures from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParseError> {
        let fixtures: Self = serde_yaml_ng::from_str(yaml)?;
        fixtures.check()?;
        tracing::debug!(
            provinces = fixtures.provinces.len(),
            countries = fixtures.countries.len(),
            seeded_emails = fixtures.seeded_emails.len(),
            "fixtures loaded"
        );
        Ok(fixtures)
    }

    /// The datasets the storefront ships with.
    pub fn storefront() -> Result<Self, ParseError> {
        Self::from_yaml(STOREFRONT_YAML)
    }

    /// Province display names in order.
    pub fn province_names(&self) -> Vec<String> {
        self.provinces.iter().map(|p| p.name.clone()).collect()
    }

    /// Province codes in order.
    pub fn province_codes(&self) -> Vec<String> {
        self.provinces.iter().map(|p| p.code.clone()).collect()
    }

    /// Country display names in order.
    pub fn country_names(&self) -> Vec<String> {
        self.countries.iter().map(|c| c.name.clone()).collect()
    }

    /// Country codes in order.
    pub fn country_codes(&self) -> Vec<String> {
        self.countries.iter().map(|c| c.code.clone()).collect()
    }

    /// Provinces of one region.
    pub fn provinces_in(&self, region: Region) -> impl Iterator<Item = &Province> {
        self.provinces.iter().filter(move |p| p.region == region)
    }

    /// Check an address against the seeded accounts (trim + lowercase).
    pub fn is_seeded_email(&self, email: &str) -> bool {
        let normalized = RegisteredEmails::normalize(email);
        self.seeded_emails
            .iter()
            .any(|seeded| RegisteredEmails::normalize(seeded) == normalized)
    }

    /// Seeded accounts as a lookup set.
    pub fn registered_emails(&self) -> RegisteredEmails {
        self.seeded_emails.iter().collect()
    }

    fn check(&self) -> Result<(), ParseError> {
        for (index, province) in self.provinces.iter().enumerate() {
            if province.name.trim().is_empty() {
                return Err(ParseError::InvalidValue {
                    field: format!("provinces[{index}].name"),
                    message: "must not be empty".to_string(),
                });
            }
        }
        for (index, country) in self.countries.iter().enumerate() {
            if country.name.trim().is_empty() {
                return Err(ParseError::InvalidValue {
                    field: format!("countries[{index}].name"),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_fixtures() {
        let fixtures = Fixtures::storefront().unwrap();
        assert_eq!(fixtures.provinces.len(), 13);
        assert_eq!(fixtures.province_names()[0], "Newfoundland and Labrador");
        assert_eq!(fixtures.province_codes()[5], "ON");
        assert_eq!(fixtures.country_names(), ["Canada", "United States"]);
        assert_eq!(fixtures.country_codes(), ["CA", "US"]);
        assert_eq!(fixtures.countries[0].dial_code, "+1");
        assert_eq!(fixtures.seeded_emails.len(), 3);
    }

    #[test]
    fn test_provinces_by_region() {
        let fixtures = Fixtures::storefront().unwrap();
        let prairies: Vec<&str> = fixtures
            .provinces_in(Region::Prairies)
            .map(|p| p.code.as_str())
            .collect();
        assert_eq!(prairies, ["MB", "SK", "AB"]);
        assert_eq!(fixtures.provinces_in(Region::Northern).count(), 3);
    }

    #[test]
    fn test_is_seeded_email() {
        let fixtures = Fixtures::storefront().unwrap();
        assert!(fixtures.is_seeded_email("january@email.com"));
        assert!(fixtures.is_seeded_email("  MARCH@Email.com "));
        assert!(!fixtures.is_seeded_email("newuser@example.com"));
        assert!(fixtures.registered_emails().contains("April@email.com"));
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let fixtures = Fixtures::from_yaml("seeded_emails: [a@b.co]").unwrap();
        assert!(fixtures.provinces.is_empty());
        assert!(fixtures.countries.is_empty());
        assert_eq!(fixtures.seeded_emails, ["a@b.co"]);
    }

    #[test]
    fn test_blank_province_name_rejected() {
        let yaml = "provinces:\n  - { code: XX, name: '  ', region: Central }\n";
        let err = Fixtures::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("provinces[0].name"));
    }

    #[test]
    fn test_unknown_region_rejected() {
        let yaml = "provinces:\n  - { code: XX, name: Atlantis, region: Oceanic }\n";
        assert!(matches!(Fixtures::from_yaml(yaml), Err(ParseError::Yaml(_))));
    }
}
