use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn manifest_cmd() -> Command {
    Command::cargo_bin("manifest").unwrap()
}

fn write_source(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn parse_valid_file_prints_program_json() {
    let file = write_source("entity User { property name: string }");
    manifest_cmd()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entities\""))
        .stdout(predicate::str::contains("\"errors\": []"));
}

#[test]
fn parse_reserved_word_exits_one_with_diagnostic() {
    let file = write_source("entity entity {}");
    manifest_cmd()
        .arg("parse")
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Reserved word"));
}

#[test]
fn check_clean_file_reports_no_issues() {
    let file = write_source("entity User {}");
    manifest_cmd()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no issues"));
}

#[test]
fn check_json_output_is_a_diagnostic_array() {
    let file = write_source("entity entity {}");
    manifest_cmd()
        .args(["check", "--output", "json"])
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Reserved word"))
        .stdout(predicate::str::contains("\"severity\""));
}

#[test]
fn check_text_output_has_positions() {
    let file = write_source("entity entity {}");
    manifest_cmd()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("1:8: error:"));
}

#[test]
fn unreadable_file_exits_two() {
    manifest_cmd()
        .arg("parse")
        .arg("/nonexistent/source.manifest")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot read"));
}
