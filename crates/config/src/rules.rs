//! Rule file schema and validation.
//!
//! A rule file declares, per class, the ordered rules for each field:
//!
//! ```toml
//! version = 1
//!
//! [classes.Course]
//! title = ["required"]
//! price = ["positive"]
//! ```

use fieldcheck_registry::{ValidationRule, ValidatorRegistry};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current supported rule file version.
pub const CURRENT_RULES_VERSION: u32 = 1;

/// Parsed rule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RulesConfig {
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Class name to field name to ordered rules.
    #[serde(default)]
    pub classes: BTreeMap<String, BTreeMap<String, Vec<ValidationRule>>>,
}

const fn default_version() -> u32 {
    CURRENT_RULES_VERSION
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_RULES_VERSION,
            classes: BTreeMap::new(),
        }
    }
}

impl RulesConfig {
    /// Check version and names.
    pub fn validate(&self) -> Result<(), RulesConfigError> {
        if self.version != CURRENT_RULES_VERSION {
            return Err(RulesConfigError::UnsupportedVersion {
                found: self.version,
            });
        }
        for (class_name, fields) in &self.classes {
            if class_name.trim().is_empty() {
                return Err(RulesConfigError::EmptyClassName);
            }
            if fields.keys().any(|field| field.trim().is_empty()) {
                return Err(RulesConfigError::EmptyFieldName {
                    class: class_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Register every declared rule, in (class, field, rule) order.
    ///
    /// Repeated entries in one rule array are registered repeatedly.
    #[must_use]
    pub fn into_registry(self) -> ValidatorRegistry {
        let mut registry = ValidatorRegistry::new();
        for (class_name, fields) in self.classes {
            for (field_name, rules) in fields {
                for rule in rules {
                    registry.register(class_name.as_str(), field_name.as_str(), rule);
                }
            }
        }
        registry
    }

    /// Total number of rule entries across all classes.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.classes
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

/// Schema-level rule file failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesConfigError {
    /// The file declares a version this build does not understand.
    UnsupportedVersion {
        /// Declared version.
        found: u32,
    },
    /// A class table key is blank.
    EmptyClassName,
    /// A field key inside a class table is blank.
    EmptyFieldName {
        /// Class containing the blank field.
        class: String,
    },
}

impl fmt::Display for RulesConfigError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found } => write!(
                formatter,
                "unsupported rules version {found} (expected {CURRENT_RULES_VERSION})"
            ),
            Self::EmptyClassName => formatter.write_str("class names must be non-empty"),
            Self::EmptyFieldName { class } => {
                write!(formatter, "field names in class `{class}` must be non-empty")
            },
        }
    }
}

impl std::error::Error for RulesConfigError {}

impl From<RulesConfigError> for ErrorEnvelope {
    fn from(error: RulesConfigError) -> Self {
        let message = error.to_string();
        match error {
            RulesConfigError::UnsupportedVersion { found } => {
                Self::expected(ErrorCode::new("config", "unsupported_version"), message)
                    .with_metadata("version", found.to_string())
            },
            RulesConfigError::EmptyClassName => {
                Self::expected(ErrorCode::new("config", "empty_name"), message)
            },
            RulesConfigError::EmptyFieldName { class } => {
                Self::expected(ErrorCode::new("config", "empty_name"), message)
                    .with_metadata("class", class)
            },
        }
    }
}
