//! Candidate records submitted for validation.

use crate::value::FieldValue;
use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// JSON key carrying the class tag in the flat candidate form.
pub const CLASS_NAME_KEY: &str = "className";

static UNDEFINED: FieldValue = FieldValue::Undefined;

/// A class tag plus named field values.
///
/// Candidates are built immediately before validation and are never
/// modified by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    class_name: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Candidate {
    /// Create an empty candidate for the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Class tag used for the registry lookup.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Value of the named field, or [`FieldValue::Undefined`] when absent.
    #[must_use]
    pub fn value_of(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&UNDEFINED)
    }

    /// Iterate over the present fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Parse the flat JSON form: `{"className": "Course", "title": "..."}`.
    ///
    /// Every key other than `className` becomes a field.
    pub fn from_json(value: &Value) -> Result<Self, CandidateError> {
        let Value::Object(entries) = value else {
            return Err(CandidateError::NotAnObject {
                found: json_type_name(value),
            });
        };
        let class_name = match entries.get(CLASS_NAME_KEY) {
            None => return Err(CandidateError::MissingClassName),
            Some(Value::String(name)) if name.trim().is_empty() => {
                return Err(CandidateError::MissingClassName);
            },
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(CandidateError::InvalidClassName {
                    found: json_type_name(other),
                });
            },
        };

        let fields = entries
            .iter()
            .filter(|(key, _)| key.as_str() != CLASS_NAME_KEY)
            .map(|(key, value)| (key.clone(), FieldValue::from(value)))
            .collect();
        Ok(Self { class_name, fields })
    }

    /// Parse a JSON document into a candidate.
    pub fn from_json_str(input: &str) -> Result<Self, CandidateError> {
        let value: Value =
            serde_json::from_str(input).map_err(|error| CandidateError::InvalidJson {
                message: error.to_string(),
            })?;
        Self::from_json(&value)
    }
}

/// Failures while building a candidate from external input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    /// Input was not valid JSON.
    InvalidJson {
        /// Parser message.
        message: String,
    },
    /// The top-level JSON value was not an object.
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },
    /// `className` is absent or blank.
    MissingClassName,
    /// `className` is not a string.
    InvalidClassName {
        /// JSON type that was found instead.
        found: &'static str,
    },
}

impl CandidateError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidJson { .. } => ErrorCode::new("candidate", "invalid_json"),
            Self::NotAnObject { .. } => ErrorCode::new("candidate", "not_an_object"),
            Self::MissingClassName | Self::InvalidClassName { .. } => {
                ErrorCode::new("candidate", "invalid_class_name")
            },
        }
    }
}

impl fmt::Display for CandidateError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { message } => write!(formatter, "invalid candidate JSON: {message}"),
            Self::NotAnObject { found } => {
                write!(formatter, "candidate must be a JSON object, found {found}")
            },
            Self::MissingClassName => formatter.write_str("candidate must carry a className"),
            Self::InvalidClassName { found } => {
                write!(formatter, "className must be a string, found {found}")
            },
        }
    }
}

impl std::error::Error for CandidateError {}

impl From<CandidateError> for ErrorEnvelope {
    fn from(error: CandidateError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            CandidateError::NotAnObject { found } | CandidateError::InvalidClassName { found } => {
                envelope.with_metadata("found", found)
            },
            CandidateError::InvalidJson { .. } | CandidateError::MissingClassName => envelope,
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
