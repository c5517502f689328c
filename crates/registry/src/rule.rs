//! The closed set of field validation rules.

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single field-level check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationRule {
    /// The field must be present and non-empty / non-zero.
    Required,
    /// The field must be a number strictly greater than zero.
    Positive,
}

impl ValidationRule {
    /// All supported rules, in declaration order.
    pub const ALL: [Self; 2] = [Self::Required, Self::Positive];

    /// Stable lowercase identifier used in rule files and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Positive => "positive",
        }
    }

    /// Evaluate the rule against a single field value.
    #[must_use]
    pub fn evaluate(self, value: &FieldValue) -> bool {
        match self {
            Self::Required => value.is_truthy(),
            Self::Positive => value.is_positive_number(),
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returned when a rule identifier is not part of the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRuleError {
    /// The rejected identifier.
    pub input: String,
}

impl fmt::Display for UnknownRuleError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "unknown validation rule `{}` (expected `required` or `positive`)",
            self.input
        )
    }
}

impl std::error::Error for UnknownRuleError {}

impl FromStr for ValidationRule {
    type Err = UnknownRuleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == normalized)
            .ok_or_else(|| UnknownRuleError {
                input: input.to_string(),
            })
    }
}
