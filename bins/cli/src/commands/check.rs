//! Check command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_json_line};
use fieldcheck_config::{RulesEnv, load_registry};
use fieldcheck_registry::{Candidate, FieldValue, RuleViolation};
use fieldcheck_shared::ErrorEnvelope;
use std::io::{self, Read};
use std::path::Path;

/// Inputs for the check command.
#[derive(Debug, Clone, Copy)]
pub struct CheckCommandInput<'a> {
    pub rules: Option<&'a Path>,
    pub candidate: Option<&'a Path>,
    pub class_name: Option<&'a str>,
    /// `name=value` pairs kept as text.
    pub fields: &'a [String],
    /// `name=value` pairs coerced to numbers.
    pub numbers: &'a [String],
}

/// Run the check command.
pub fn run_check(
    mode: OutputMode,
    env: &RulesEnv,
    input: CheckCommandInput<'_>,
) -> Result<CliOutput, CliError> {
    let candidate = build_candidate(input)?;
    let registry = load_registry(input.rules, env)?;

    let violations = registry.violations(&candidate);
    let valid = violations.is_empty();
    tracing::info!(
        class = candidate.class_name(),
        valid,
        violations = violations.len(),
        "checked candidate"
    );

    let stdout = if mode.is_json() {
        format_check_json(&candidate, &violations)?
    } else {
        format_check_text(&violations)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: if valid {
            ExitCode::Ok
        } else {
            ExitCode::Rejected
        },
    })
}

fn build_candidate(input: CheckCommandInput<'_>) -> Result<Candidate, CliError> {
    if let Some(path) = input.candidate {
        let text = read_candidate_source(path)?;
        let mut candidate = Candidate::from_json_str(&text).map_err(ErrorEnvelope::from)?;
        apply_field_args(&mut candidate, input)?;
        return Ok(candidate);
    }

    let class_name = input
        .class_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CliError::InvalidInput("missing --candidate or --class".to_string()))?;
    let mut candidate = Candidate::new(class_name);
    apply_field_args(&mut candidate, input)?;
    Ok(candidate)
}

/// Text fields first, then numbers; a later pair for the same name wins.
fn apply_field_args(
    candidate: &mut Candidate,
    input: CheckCommandInput<'_>,
) -> Result<(), CliError> {
    let text = parse_field_args(input.fields, |value| FieldValue::Text(value.to_string()))?;
    let numbers = parse_field_args(input.numbers, FieldValue::coerce_number)?;
    for (name, value) in text.into_iter().chain(numbers) {
        candidate.insert(name, value);
    }
    Ok(())
}

fn read_candidate_source(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => CliError::InvalidInput(format!(
            "candidate file not found: {}",
            path.display()
        )),
        _ => CliError::Io(error),
    })
}

/// Split `name=value` pairs and convert each value.
fn parse_field_args(
    fields: &[String],
    convert: impl Fn(&str) -> FieldValue,
) -> Result<Vec<(String, FieldValue)>, CliError> {
    fields
        .iter()
        .map(|raw| {
            let (name, value) = raw.split_once('=').ok_or_else(|| {
                CliError::InvalidInput(format!("field `{raw}` must look like name=value"))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(CliError::InvalidInput(format!(
                    "field `{raw}` is missing a name"
                )));
            }
            Ok((name.to_string(), convert(value)))
        })
        .collect()
}

fn format_check_text(violations: &[RuleViolation]) -> String {
    if violations.is_empty() {
        return "valid\n".to_string();
    }
    let mut output = String::from("invalid\n");
    for violation in violations {
        output.push_str(&format!("  {}: {}\n", violation.field, violation.rule));
    }
    output
}

fn format_check_json(
    candidate: &Candidate,
    violations: &[RuleViolation],
) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "className": candidate.class_name(),
        "valid": violations.is_empty(),
        "violations": violations,
    });
    Ok(to_json_line(&payload)?)
}
