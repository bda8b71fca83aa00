//! YAML form manifests and fixture datasets for Baro.

mod error;
mod fixtures;
mod manifest;

pub use error::ParseError;
pub use fixtures::{Country, Fixtures, Province, Region};
pub use manifest::{FieldConfig, FormManifest, OptionsSource, RuleConfig};
