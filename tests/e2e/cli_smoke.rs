//! CLI E2E smoke tests.

use std::io;
use std::process::{Command, Output};

fn fieldcheck(args: &[&str]) -> io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_fieldcheck"))
        .args(args)
        .env_remove("FIELDCHECK_RULES")
        .env_remove("FIELDCHECK_LOG")
        .env_remove("FIELDCHECK_LOG_FORMAT")
        .output()
}

#[test]
fn info_json_is_deterministic() -> io::Result<()> {
    let first = fieldcheck(&["info", "--json"])?;
    let second = fieldcheck(&["info", "--json"])?;

    assert!(first.status.success(), "info should succeed");
    assert_eq!(first.stdout, second.stdout, "info output should be deterministic");

    let value: serde_json::Value = serde_json::from_slice(&first.stdout).map_err(io::Error::other)?;
    assert_eq!(
        value.get("rules"),
        Some(&serde_json::json!(["required", "positive"]))
    );
    Ok(())
}

#[test]
fn check_without_rules_exits_with_invalid_input() -> io::Result<()> {
    let output = fieldcheck(&["check", "--class", "Course", "--field", "title=Intro"])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config:missing_rules_path"),
        "unexpected stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn invalid_log_format_fails_fast() -> io::Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_fieldcheck"))
        .arg("info")
        .env_remove("FIELDCHECK_RULES")
        .env_remove("FIELDCHECK_LOG")
        .env("FIELDCHECK_LOG_FORMAT", "yaml")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    Ok(())
}
