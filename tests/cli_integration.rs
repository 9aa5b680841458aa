//! CLI integration tests
//!
//! Exercises argument handling of the `formgate` binary without touching the
//! network.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_describes_send_flags() {
    let mut cmd = Command::cargo_bin("formgate").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--path"))
        .stdout(predicate::str::contains("--field"))
        .stdout(predicate::str::contains("--raw"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("formgate").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_path_is_an_error() {
    let mut cmd = Command::cargo_bin("formgate").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--path"));
}

#[test]
fn test_malformed_field_is_an_error() {
    let mut cmd = Command::cargo_bin("formgate").unwrap();
    cmd.args(["--path", "page=x", "--field", "no-equals"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}
