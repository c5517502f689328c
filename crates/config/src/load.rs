//! Rule file loading helpers (env + file + flag).
//!
//! The loader is responsible for path resolution, format detection, and
//! surfacing user-facing errors as typed `ErrorEnvelope`s.

use crate::{RulesConfig, RulesEnv};
use fieldcheck_registry::ValidatorRegistry;
use fieldcheck_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result, ResultExt};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RulesFormat {
    Json,
    Toml,
}

/// Parse and validate a JSON rule file.
pub fn parse_rules_json(input: &str) -> Result<RulesConfig> {
    parse_rules(input, RulesFormat::Json)
}

/// Parse and validate a TOML rule file.
pub fn parse_rules_toml(input: &str) -> Result<RulesConfig> {
    parse_rules(input, RulesFormat::Toml)
}

/// Load a rule file, detecting the format from its extension.
pub fn load_rules_from_path(path: &Path) -> Result<RulesConfig> {
    let format = detect_rules_format(path)?;
    let text = read_rules_file(path)?;
    parse_rules(&text, format).with_error_metadata("path", path.to_string_lossy())
}

/// Resolve the rules path.
///
/// Precedence (highest wins):
/// - explicit path (CLI flag)
/// - `FIELDCHECK_RULES`
pub fn resolve_rules_path(explicit: Option<&Path>, env: &RulesEnv) -> Result<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.rules_path.clone())
        .ok_or_else(|| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "missing_rules_path"),
                "no rules file given; pass --rules or set FIELDCHECK_RULES",
            )
        })
}

/// Resolve and load a rule file, keeping the parsed config.
pub fn load_rules(explicit: Option<&Path>, env: &RulesEnv) -> Result<RulesConfig> {
    let path = resolve_rules_path(explicit, env)?;
    let config = load_rules_from_path(&path)?;
    tracing::info!(
        path = %path.display(),
        classes = config.classes.len(),
        rules = config.rule_count(),
        "loaded rules file"
    );
    Ok(config)
}

/// Resolve, load, and register a rule file in one step.
pub fn load_registry(explicit: Option<&Path>, env: &RulesEnv) -> Result<ValidatorRegistry> {
    load_rules(explicit, env).map(RulesConfig::into_registry)
}

/// Serialize rules as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &RulesConfig) -> Result<String> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::invariant(
            ErrorCode::internal(),
            format!("failed to serialize rules JSON: {error}"),
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize rules as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &RulesConfig) -> Result<String> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::invariant(
            ErrorCode::internal(),
            format!("failed to serialize rules TOML: {error}"),
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn parse_rules(input: &str, format: RulesFormat) -> Result<RulesConfig> {
    let config: RulesConfig = match format {
        RulesFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid rules JSON: {error}"),
            )
        })?,
        RulesFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid rules TOML: {error}"),
            )
        })?,
    };
    config.validate()?;
    Ok(config)
}

/// A missing file is a bad path (expected); anything else that stops an
/// existing path from being read is an I/O failure.
fn read_rules_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|error| {
            let message = format!("failed to read rules file: {error}");
            match error.kind() {
                std::io::ErrorKind::NotFound => ErrorEnvelope::expected(
                    ErrorCode::new("config", "rules_file_not_found"),
                    message,
                ),
                std::io::ErrorKind::PermissionDenied => ErrorEnvelope::unexpected(
                    ErrorCode::new("config", "rules_file_permission_denied"),
                    message,
                    ErrorClass::NonRetriable,
                ),
                _ => ErrorEnvelope::unexpected(
                    ErrorCode::new("config", "rules_file_io"),
                    message,
                    ErrorClass::NonRetriable,
                ),
            }
        })
        .with_error_metadata("path", path.to_string_lossy())
}

fn detect_rules_format(path: &Path) -> Result<RulesFormat> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(RulesFormat::Json),
        Some("toml") => Ok(RulesFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported rules format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}
