//! The validator registry and the validation pass.
//!
//! Registration happens during an explicit setup routine; afterwards the
//! registry is read-only and can be shared across threads behind an `Arc`.

use crate::candidate::Candidate;
use crate::rule::ValidationRule;
use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Per-class rule table: field name to the ordered rules registered for it.
pub type ClassRules = BTreeMap<String, Vec<ValidationRule>>;

/// Mapping from class name to per-field rule sequences.
///
/// Entries are only ever appended. Registering the same
/// (class, field, rule) twice stores the rule twice; the validation
/// outcome is unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatorRegistry {
    classes: BTreeMap<String, ClassRules>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rule` to `registry[class_name][field_name]`.
    pub fn register(
        &mut self,
        class_name: impl Into<String>,
        field_name: impl Into<String>,
        rule: ValidationRule,
    ) {
        let class_name = class_name.into();
        let field_name = field_name.into();
        tracing::debug!(
            class = %class_name,
            field = %field_name,
            rule = %rule,
            "registering validation rule"
        );
        self.classes
            .entry(class_name)
            .or_default()
            .entry(field_name)
            .or_default()
            .push(rule);
    }

    /// Register every rule a [`Validatable`] type declares on its fields.
    pub fn register_type<T: Validatable>(&mut self) {
        T::register_rules(self);
    }

    /// Builder-style [`ValidatorRegistry::register_type`] for setup routines.
    #[must_use]
    pub fn with_type<T: Validatable>(mut self) -> Self {
        self.register_type::<T>();
        self
    }

    /// Rules stored for one field, in registration order.
    #[must_use]
    pub fn rules_for(&self, class_name: &str, field_name: &str) -> &[ValidationRule] {
        self.classes
            .get(class_name)
            .and_then(|fields| fields.get(field_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Full rule table for one class, if any rules were registered.
    #[must_use]
    pub fn fields_for(&self, class_name: &str) -> Option<&ClassRules> {
        self.classes.get(class_name)
    }

    /// Registered class names in sorted order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Number of classes with at least one registered rule.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns true when the candidate satisfies every registered rule.
    ///
    /// Classes without registered rules are accepted unconditionally.
    #[must_use]
    pub fn validate(&self, candidate: &Candidate) -> bool {
        self.violations(candidate).is_empty()
    }

    /// Every failed (field, rule) pair, in field-name then registration order.
    ///
    /// All rules are evaluated; nothing short-circuits.
    #[must_use]
    pub fn violations(&self, candidate: &Candidate) -> Vec<RuleViolation> {
        let Some(fields) = self.classes.get(candidate.class_name()) else {
            tracing::trace!(
                class = candidate.class_name(),
                "no rules registered; accepting"
            );
            return Vec::new();
        };

        let mut violations = Vec::new();
        for (field, rules) in fields {
            let value = candidate.value_of(field);
            for rule in rules {
                if !rule.evaluate(value) {
                    violations.push(RuleViolation {
                        field: field.clone(),
                        rule: *rule,
                    });
                }
            }
        }
        tracing::trace!(
            class = candidate.class_name(),
            violations = violations.len(),
            "validated candidate"
        );
        violations
    }

    /// Like [`ValidatorRegistry::validate`], but reports the failed rules.
    pub fn check(&self, candidate: &Candidate) -> Result<(), ErrorEnvelope> {
        let violations = self.violations(candidate);
        if violations.is_empty() {
            return Ok(());
        }
        Err(rejection(candidate.class_name(), &violations))
    }

    /// Validate a typed value through its candidate snapshot.
    #[must_use]
    pub fn validate_value<T: Validatable>(&self, value: &T) -> bool {
        self.validate(&value.to_candidate())
    }

    /// Check a typed value through its candidate snapshot.
    pub fn check_value<T: Validatable>(&self, value: &T) -> Result<(), ErrorEnvelope> {
        self.check(&value.to_candidate())
    }
}

/// One failed rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleViolation {
    /// Field whose value failed the rule.
    pub field: String,
    /// The rule that failed.
    pub rule: ValidationRule,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.field, self.rule)
    }
}

fn rejection(class_name: &str, violations: &[RuleViolation]) -> ErrorEnvelope {
    let joined = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    ErrorEnvelope::expected(
        ErrorCode::validation_rejected(),
        format!("{class_name} failed {} validation rule(s)", violations.len()),
    )
    .with_metadata("class", class_name)
    .with_metadata("violations", joined)
}

/// A type whose fields carry validation annotations.
///
/// Usually implemented with `#[derive(Validatable)]`; manual impls are fine
/// for types that need a custom candidate snapshot.
pub trait Validatable {
    /// Class tag the rules are registered under.
    const CLASS_NAME: &'static str;

    /// Register this type's field rules, one call per annotation.
    fn register_rules(registry: &mut ValidatorRegistry);

    /// Snapshot the annotated fields as a candidate.
    fn to_candidate(&self) -> Candidate;
}
