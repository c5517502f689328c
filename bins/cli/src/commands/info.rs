//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_json_line};
use fieldcheck_config::config_crate_version;
use fieldcheck_registry::{ValidationRule, registry_crate_version};
use fieldcheck_shared::shared_crate_version;

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let rules: Vec<&str> = ValidationRule::ALL
        .into_iter()
        .map(ValidationRule::as_str)
        .collect();

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "crates": {
                "registry": registry_crate_version(),
                "config": config_crate_version(),
                "shared": shared_crate_version(),
            },
            "rules": rules,
        });
        to_json_line(&payload)?
    } else {
        format!(
            "status: ok\nname: {}\nversion: {}\nregistry: {}\nconfig: {}\nshared: {}\nrules: {}\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            registry_crate_version(),
            config_crate_version(),
            shared_crate_version(),
            rules.join(", "),
        )
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
