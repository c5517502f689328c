//! CLI E2E flow: rules file + candidates through `check` and `rules`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn rules_fixture(name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join("config")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn base_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fieldcheck"));
    command
        .env_remove("FIELDCHECK_RULES")
        .env_remove("FIELDCHECK_LOG")
        .env_remove("FIELDCHECK_LOG_FORMAT");
    command
}

fn check_fields(
    rules: &Path,
    class: &str,
    fields: &[&str],
    numbers: &[&str],
) -> io::Result<Output> {
    let mut command = base_command();
    command.arg("check").arg("--rules").arg(rules).args(["--class", class]);
    for field in fields {
        command.args(["--field", field]);
    }
    for number in numbers {
        command.args(["--number", number]);
    }
    command.output()
}

fn stdout_json(output: &Output) -> io::Result<serde_json::Value> {
    serde_json::from_slice(&output.stdout).map_err(io::Error::other)
}

#[test]
fn valid_course_exits_zero() -> io::Result<()> {
    let rules = rules_fixture("course.rules.toml");
    let output = check_fields(&rules, "Course", &["title=Intro"], &["price=10"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "valid\n");
    Ok(())
}

#[test]
fn empty_title_and_zero_price_are_both_reported() -> io::Result<()> {
    let rules = rules_fixture("course.rules.json");
    let output = check_fields(&rules, "Course", &["title="], &["price=0"])?;

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "invalid\n  price: positive\n  title: required\n"
    );
    Ok(())
}

#[test]
fn text_zero_is_present_for_required() -> io::Result<()> {
    let rules = rules_fixture("course.rules.toml");
    let output = check_fields(&rules, "Course", &["title=0"], &["price=5"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "valid\n");
    Ok(())
}

#[test]
fn non_form_infinity_spellings_fail_positive() -> io::Result<()> {
    let rules = rules_fixture("course.rules.toml");
    let output = check_fields(&rules, "Course", &["title=Intro"], &["price=inf"])?;

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "invalid\n  price: positive\n"
    );
    Ok(())
}

#[test]
fn unknown_class_is_accepted() -> io::Result<()> {
    let rules = rules_fixture("course.rules.toml");
    let output = check_fields(&rules, "Unregistered", &[], &[])?;

    assert_eq!(output.status.code(), Some(0));
    Ok(())
}

#[test]
fn candidate_json_from_stdin() -> io::Result<()> {
    let mut child = base_command()
        .arg("check")
        .arg("--rules")
        .arg(rules_fixture("course.rules.toml"))
        .args(["--candidate", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("stdin not piped"))?
        .write_all(br#"{"className":"Product","title":"Lamp"}"#)?;
    let output = child.wait_with_output()?;

    assert_eq!(output.status.code(), Some(4));
    let value = stdout_json(&output)?;
    assert_eq!(
        value,
        serde_json::json!({
            "className": "Product",
            "valid": false,
            "violations": [
                { "field": "price", "rule": "required" },
                { "field": "price", "rule": "positive" },
            ],
        })
    );
    Ok(())
}

#[test]
fn rules_path_falls_back_to_env() -> io::Result<()> {
    let output = base_command()
        .args(["rules", "--json"])
        .env("FIELDCHECK_RULES", rules_fixture("course.rules.toml"))
        .output()?;

    assert!(output.status.success());
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/classes/Product/price"),
        Some(&serde_json::json!(["required", "positive"]))
    );
    Ok(())
}

#[test]
fn rules_text_lists_every_field() -> io::Result<()> {
    let output = base_command()
        .arg("rules")
        .arg("--rules")
        .arg(rules_fixture("course.rules.toml"))
        .output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Course.price: positive\nCourse.title: required\n\
         Product.price: required, positive\nProduct.title: required\n"
    );
    Ok(())
}

#[test]
fn unsupported_rules_version_is_invalid_input() -> io::Result<()> {
    let output = base_command()
        .arg("rules")
        .arg("--rules")
        .arg(rules_fixture("unsupported-version.rules.toml"))
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config:unsupported_version"),
        "unexpected stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn rules_toml_output_loads_back() -> io::Result<()> {
    let output = base_command()
        .args(["rules", "--toml", "--rules"])
        .arg(rules_fixture("course.rules.json"))
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("version = 1"), "unexpected toml: {stdout}");
    assert!(
        stdout.contains("[classes.Product]"),
        "unexpected toml: {stdout}"
    );
    assert!(stdout.contains("\"positive\""), "unexpected toml: {stdout}");
    Ok(())
}

#[test]
fn unreadable_rules_path_exits_with_io() -> io::Result<()> {
    let directory = rules_fixture("");
    let output = base_command()
        .arg("rules")
        .arg("--rules")
        .arg(&directory)
        .output()?;

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config:rules_file_io"),
        "unexpected stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn unreadable_candidate_path_exits_with_io() -> io::Result<()> {
    let output = base_command()
        .arg("check")
        .arg("--rules")
        .arg(rules_fixture("course.rules.toml"))
        .arg("--candidate")
        .arg(rules_fixture(""))
        .output()?;

    assert_eq!(output.status.code(), Some(3));
    Ok(())
}
