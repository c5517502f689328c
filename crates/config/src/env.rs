//! Environment variable parsing.
//!
//! Env parsing is strict: a variable that is present but blank or carries an
//! unknown value fails fast instead of silently falling back to a default.

use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Env var: default rules file path.
pub const ENV_RULES_PATH: &str = "FIELDCHECK_RULES";
/// Env var: tracing filter directives (`EnvFilter` syntax).
pub const ENV_LOG_FILTER: &str = "FIELDCHECK_LOG";
/// Env var: log line format (`text` or `json`).
pub const ENV_LOG_FORMAT: &str = "FIELDCHECK_LOG_FORMAT";

/// Log line format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(var: &'static str, raw: &str) -> Result<Self, EnvParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(EnvParseError::InvalidEnum {
                var,
                value: raw.to_string(),
            }),
        }
    }
}

/// Parsed `FIELDCHECK_*` environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesEnv {
    /// Rules file used when no `--rules` flag is given.
    pub rules_path: Option<PathBuf>,
    /// Tracing filter directives.
    pub log_filter: Option<Box<str>>,
    /// Log line format.
    pub log_format: LogFormat,
}

impl RulesEnv {
    /// Parse from an explicit variable map (tests and embedding callers).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        let rules_path = parse_optional_trimmed_string(map, ENV_RULES_PATH)?
            .map(|value| PathBuf::from(value.as_ref()));
        let log_filter = parse_optional_trimmed_string(map, ENV_LOG_FILTER)?;
        let log_format = map
            .get(ENV_LOG_FORMAT)
            .map(|raw| LogFormat::parse(ENV_LOG_FORMAT, raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            rules_path,
            log_filter,
            log_format,
        })
    }

    /// Parse from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in [ENV_RULES_PATH, ENV_LOG_FILTER, ENV_LOG_FORMAT] {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty when set"),
            Self::InvalidEnum { var, value } => {
                write!(formatter, "{var} has unsupported value `{value}`")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let message = error.to_string();
        match error {
            EnvParseError::EmptyValue { var } => {
                Self::expected(ErrorCode::new("config", "env_empty_value"), message)
                    .with_metadata("var", var)
            },
            EnvParseError::InvalidEnum { var, value } => {
                Self::expected(ErrorCode::new("config", "env_invalid_value"), message)
                    .with_metadata("var", var)
                    .with_metadata("value", value)
            },
        }
    }
}
