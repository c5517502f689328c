//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;

use clap::{Parser, Subcommand};
use commands::{CheckCommandInput, run_check, run_info, run_rules};
use error::{CliError, ExitCode};
use fieldcheck_config::RulesEnv;
use fieldcheck_shared::ErrorEnvelope;
use format::{OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fieldcheck",
    version,
    about = "Declarative field validation for class-tagged records",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate one candidate record against a rules file.
    Check {
        /// Rules file (JSON/TOML). Falls back to `FIELDCHECK_RULES`.
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Candidate JSON file carrying a `className` key (`-` reads stdin).
        #[arg(long, conflicts_with = "class")]
        candidate: Option<PathBuf>,
        /// Class name for a candidate built from `--field` flags.
        #[arg(long = "class")]
        class: Option<String>,
        /// Text field as `name=value`; repeatable. The value is kept verbatim.
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Numeric field as `name=value`; repeatable. Coerced like form input
        /// (empty is 0, unparsable is NaN).
        #[arg(long = "number", value_name = "NAME=VALUE")]
        numbers: Vec<String>,
    },
    /// Print the rules a rules file registers.
    Rules {
        /// Rules file (JSON/TOML). Falls back to `FIELDCHECK_RULES`.
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Print the rules as a TOML rules file instead.
        #[arg(long)]
        toml: bool,
    },
    /// Show build and version details.
    Info,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    let env = match RulesEnv::from_std_env() {
        Ok(env) => env,
        Err(error) => return exit_with_error(&CliError::from(ErrorEnvelope::from(error))),
    };
    logging::init_tracing(env.log_filter.as_deref(), env.log_format);

    match run(&cli.command, mode, &env) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode, env: &RulesEnv) -> Result<CliOutput, CliError> {
    match command {
        Commands::Check {
            rules,
            candidate,
            class,
            fields,
            numbers,
        } => run_check(
            mode,
            env,
            CheckCommandInput {
                rules: rules.as_deref(),
                candidate: candidate.as_deref(),
                class_name: class.as_deref(),
                fields,
                numbers,
            },
        ),
        Commands::Rules { rules, toml } => run_rules(mode, env, rules.as_deref(), *toml),
        Commands::Info => run_info(mode),
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use clap::CommandFactory;
    use std::path::Path;

    fn workspace_root() -> PathBuf {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        manifest_dir
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| manifest_dir.to_path_buf())
    }

    fn fixture_path(relative: &str) -> PathBuf {
        workspace_root()
            .join("crates")
            .join("config")
            .join("tests")
            .join("fixtures")
            .join(relative)
    }

    fn json_mode() -> OutputMode {
        OutputMode::from_args(&OutputArgs {
            output: Some(OutputFormat::Json),
            json: false,
        })
    }

    fn text_mode() -> OutputMode {
        OutputMode::from_args(&OutputArgs {
            output: None,
            json: false,
        })
    }

    #[test]
    fn version_flag_is_supported() {
        let result = Cli::command().try_get_matches_from(["cli", "--version"]);
        let is_version = matches!(
            result,
            Err(error) if error.kind() == clap::error::ErrorKind::DisplayVersion
        );

        assert!(is_version, "expected clap to render version");
    }

    #[test]
    fn candidate_and_class_flags_conflict() {
        let result = Cli::command().try_get_matches_from([
            "cli",
            "check",
            "--candidate",
            "course.json",
            "--class",
            "Course",
        ]);
        let is_conflict = matches!(
            result,
            Err(error) if error.kind() == clap::error::ErrorKind::ArgumentConflict
        );

        assert!(is_conflict, "expected --candidate and --class to conflict");
    }

    #[test]
    fn check_json_output_shape() -> Result<(), Box<dyn std::error::Error>> {
        let command = Commands::Check {
            rules: Some(fixture_path("course.rules.toml")),
            candidate: None,
            class: Some("Course".to_string()),
            fields: vec!["title=Intro".to_string()],
            numbers: vec!["price=0".to_string()],
        };
        let output = run(&command, json_mode(), &RulesEnv::default())?;
        assert_eq!(output.exit_code, ExitCode::Rejected);

        let value: serde_json::Value = serde_json::from_str(output.stdout.trim())?;
        assert_eq!(
            value.get("className").and_then(serde_json::Value::as_str),
            Some("Course")
        );
        assert_eq!(
            value.get("valid").and_then(serde_json::Value::as_bool),
            Some(false)
        );
        assert_eq!(
            value.get("violations"),
            Some(&serde_json::json!([{ "field": "price", "rule": "positive" }]))
        );
        Ok(())
    }

    #[test]
    fn text_zero_satisfies_required() -> Result<(), Box<dyn std::error::Error>> {
        let command = Commands::Check {
            rules: Some(fixture_path("course.rules.toml")),
            candidate: None,
            class: Some("Course".to_string()),
            fields: vec!["title=0".to_string()],
            numbers: vec!["price=5".to_string()],
        };
        let output = run(&command, text_mode(), &RulesEnv::default())?;

        assert_eq!(output.stdout, "valid\n");
        assert_eq!(output.exit_code, ExitCode::Ok);
        Ok(())
    }

    #[test]
    fn unreadable_rules_path_is_an_io_failure() {
        let command = Commands::Rules {
            rules: Some(fixture_path("")),
            toml: false,
        };
        let result = run(&command, json_mode(), &RulesEnv::default());

        assert!(matches!(
            result.as_ref().map_err(CliError::exit_code),
            Err(ExitCode::Io)
        ));
    }

    #[test]
    fn missing_rules_file_is_invalid_input() {
        let command = Commands::Rules {
            rules: None,
            toml: false,
        };
        let result = run(&command, json_mode(), &RulesEnv::default());

        assert!(matches!(
            result.as_ref().map_err(CliError::exit_code),
            Err(ExitCode::InvalidInput)
        ));
    }
}
