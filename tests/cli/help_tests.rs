use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("ballot").expect("Failed to find binary");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("vote"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("ballot").expect("Failed to find binary");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_vote_help() {
    let mut cmd = Command::cargo_bin("ballot").expect("Failed to find binary");
    cmd.args(["vote", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cast a vote"));
}

#[test]
fn test_completions_for_bash() {
    let mut cmd = Command::cargo_bin("ballot").expect("Failed to find binary");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_ballot"));
}
