//! # fieldcheck-registry
//!
//! Declarative field validation: per-class rule tables, candidate records,
//! and the validation pass that consults them.
//!
//! A setup routine registers rules (by hand or through
//! `#[derive(Validatable)]`), producing a [`ValidatorRegistry`] value that is
//! then passed to whatever needs to validate candidates.
//!
//! ```
//! use fieldcheck_registry::{Candidate, FieldValue, ValidationRule, ValidatorRegistry};
//!
//! let mut registry = ValidatorRegistry::new();
//! registry.register("Course", "title", ValidationRule::Required);
//! registry.register("Course", "price", ValidationRule::Positive);
//!
//! let candidate = Candidate::new("Course")
//!     .with_field("title", FieldValue::Text("Intro".to_string()))
//!     .with_field("price", FieldValue::Number(5.0));
//! assert!(registry.validate(&candidate));
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Candidate records and JSON parsing.
pub mod candidate;
/// The registry and the validation pass.
pub mod registry;
/// Validation rule kinds.
pub mod rule;
/// Dynamic field values.
pub mod value;

pub use candidate::{CLASS_NAME_KEY, Candidate, CandidateError};
pub use registry::{ClassRules, RuleViolation, Validatable, ValidatorRegistry};
pub use rule::{UnknownRuleError, ValidationRule};
pub use value::{FieldValue, IntoFieldValue};

/// `#[derive(Validatable)]`: turns `#[validate(..)]` field annotations into
/// [`Validatable::register_rules`] calls.
pub use fieldcheck_validate_derive::Validatable;

/// Returns the registry crate version.
#[must_use]
pub const fn registry_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
