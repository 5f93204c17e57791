use super::common::{tag_value, TestContext};
use predicates::prelude::*;

#[test]
fn test_deploy_needs_four_choices() {
    let ctx = TestContext::with_seed("alice");
    ctx.ballot()
        .args(["deploy", "YES", "NO"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR:"));
}

#[test]
fn test_blank_choice_is_rejected() {
    let ctx = TestContext::with_seed("alice");
    ctx.ballot()
        .args(["deploy", "YES", " ", "MAYBE", "LATER"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR: Invalid input"));
}

#[test]
fn test_out_of_range_vote_is_rejected() {
    let ctx = TestContext::with_seed("alice");
    let address = ctx.deploy(["A", "B", "C", "D"]);
    ctx.ballot()
        .args(["vote", &address, "9"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("between 0 and 3"));
}

#[test]
fn test_non_numeric_vote_is_rejected() {
    let ctx = TestContext::with_seed("alice");
    let address = ctx.deploy(["A", "B", "C", "D"]);
    ctx.ballot()
        .args(["vote", &address, "first"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expects a number"));
}

#[test]
fn test_unknown_address_fails() {
    let ctx = TestContext::with_seed("alice");
    ctx.ballot()
        .args(["state", "deadbeef"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no contract found at address deadbeef"));
}

#[test]
fn test_state_without_address_or_env_entry() {
    let ctx = TestContext::with_seed("alice");
    ctx.ballot()
        .arg("state")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CONTRACT_ADDRESS"));
}

#[test]
fn test_missing_wallet_seed() {
    let ctx = TestContext::with_seed("alice");
    std::fs::write(ctx.env_file(), "# nothing here\n").unwrap();
    ctx.ballot()
        .args(["deploy", "A", "B", "C", "D"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("WALLET_SEED is not set"));
}

#[test]
fn test_unknown_operation_lists_known_ones() {
    let ctx = TestContext::with_seed("alice");
    let address = ctx.deploy(["A", "B", "C", "D"]);
    ctx.ballot()
        .args(["call", &address, "reset"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("vote_for"));
}

#[test]
fn test_error_prefix_is_plain_without_no_color() {
    let ctx = TestContext::with_seed("alice");
    let address = ctx.deploy(["A", "B", "C", "D"]);
    let output = ctx
        .ballot()
        .env_remove("NO_COLOR")
        .args(["vote", &address, "9"])
        .output()
        .expect("run vote");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first = stderr.lines().next().unwrap_or_default();
    assert!(first.starts_with("ERROR:"), "unexpected stderr line: {:?}", first);
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn test_deploy_prints_address_even_if_env_file_cannot_be_updated() {
    let ctx = TestContext::with_seed("alice");
    std::fs::create_dir(ctx.temp_dir.path().join(".env.tmp")).unwrap();

    let output = ctx
        .ballot()
        .args(["deploy", "A", "B", "C", "D"])
        .output()
        .expect("run deploy");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let address = tag_value(&stdout, "CONTRACT_ADDRESS:").expect("address is printed");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("contract deployed at {}", address)));

    ctx.ballot()
        .args(["state", &address])
        .assert()
        .success()
        .stdout(predicate::str::contains("CHOICE_0:A:0"));
}
