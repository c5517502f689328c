//! Rules command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use fieldcheck_config::{RulesEnv, load_rules, to_pretty_json, to_pretty_toml};
use fieldcheck_registry::ValidatorRegistry;
use std::path::Path;

/// Run the rules command.
///
/// JSON and TOML output are normalized rule files that load back unchanged;
/// text output lists one `Class.field: rules` line per field.
pub fn run_rules(
    mode: OutputMode,
    env: &RulesEnv,
    rules: Option<&Path>,
    as_toml: bool,
) -> Result<CliOutput, CliError> {
    let config = load_rules(rules, env)?;

    let stdout = if as_toml {
        to_pretty_toml(&config)?
    } else if mode.is_json() {
        to_pretty_json(&config)?
    } else {
        format_rules_text(&config.into_registry())
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_rules_text(registry: &ValidatorRegistry) -> String {
    let mut output = String::new();
    for class_name in registry.class_names() {
        let Some(fields) = registry.fields_for(class_name) else {
            continue;
        };
        for (field_name, rules) in fields {
            let joined = rules
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("{class_name}.{field_name}: {joined}\n"));
        }
    }
    if output.is_empty() {
        output.push_str("no rules registered\n");
    }
    output
}
