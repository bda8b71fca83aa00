//! Testing harness for Baro forms.
//!
//! [`RegisterPage`] drives the registration form like a browser would:
//! inputs are addressed by test-id selectors, errors appear once an input
//! loses focus and the register button follows the engine's verdict.
//!
//! ```
//! use baro_test::{RegisterPage, SubmitOutcome};
//! use baro_test::fixture::RegistrationData;
//!
//! let mut page = RegisterPage::open().unwrap();
//! page.fill_name("John").unwrap().fill_email("newuser@example.com").unwrap();
//! page.assert_error(
//!     "[data-testid='name']",
//!     "Input does not meet the minimum length requirement - 5 chars",
//! );
//!
//! page.reload();
//! let outcome = page.register_user(&RegistrationData::valid()).unwrap();
//! assert_eq!(outcome, SubmitOutcome::Registered { email: "newuser@example.com".into() });
//! ```

mod error;
pub mod fixture;
mod harness;
mod selector;

pub use error::HarnessError;
pub use harness::{RegisterPage, SubmitOutcome};
pub use selector::{Selector, SelectorError, SelectorParser};
