use super::common::{tag_value, TestContext};
use predicates::prelude::*;

#[test]
fn test_deploy_records_address_in_env_file() {
    let ctx = TestContext::with_seed("alice");
    let address = ctx.deploy(["YES", "NO", "MAYBE", "LATER"]);

    assert_eq!(address.len(), 64);
    let env = ctx.env_contents();
    assert!(env.starts_with("# test wallet\nWALLET_SEED=alice\n"));
    assert!(env.contains(&format!("CONTRACT_ADDRESS={}", address)));
}

#[test]
fn test_fresh_ballot_state() {
    let ctx = TestContext::with_seed("alice");
    ctx.deploy(["YES", "NO", "MAYBE", "LATER"]);

    ctx.ballot()
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL_VOTERS:0"))
        .stdout(predicate::str::contains("CHOICE_0:YES:0"))
        .stdout(predicate::str::contains("CHOICE_3:LATER:0"));
}

#[test]
fn test_votes_from_two_wallets_are_tallied() {
    let ctx = TestContext::with_seed("alice");
    let address = ctx.deploy(["YES", "NO", "MAYBE", "LATER"]);

    let output = ctx
        .ballot()
        .args(["vote", &address, "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let tx_id = tag_value(&String::from_utf8_lossy(&output.stdout), "VOTE_SUCCESS:").unwrap();
    assert_eq!(tx_id.len(), 64);

    ctx.switch_seed("bob");
    ctx.ballot().args(["vote", &address, "1"]).assert().success();

    ctx.ballot()
        .args(["state", &address])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL_VOTERS:2"))
        .stdout(predicate::str::contains("CHOICE_1:NO:2"))
        .stdout(predicate::str::contains("CHOICE_0:YES:0"));
}

#[test]
fn test_second_vote_from_same_wallet_fails() {
    let ctx = TestContext::with_seed("carol");
    let address = ctx.deploy(["A", "B", "C", "D"]);

    ctx.ballot().args(["vote", &address, "0"]).assert().success();
    ctx.ballot()
        .args(["vote", &address, "2"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("VOTE_SUCCESS").not())
        .stderr(predicate::str::contains("ERROR:"))
        .stderr(predicate::str::contains("already a member"));

    ctx.ballot()
        .args(["state", &address])
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL_VOTERS:1"));
}

#[test]
fn test_display_draws_bars() {
    let ctx = TestContext::with_seed("dave");
    let address = ctx.deploy(["Red", "Green", "Blue", "None"]);
    ctx.ballot().args(["vote", &address, "2"]).assert().success();

    ctx.ballot()
        .arg("display")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total voters: 1"))
        .stdout(predicate::str::contains("Blue"))
        .stdout(predicate::str::contains("█"));
}

#[test]
fn test_call_runs_a_generated_query() {
    let ctx = TestContext::with_seed("erin");
    let address = ctx.deploy(["A", "B", "C", "D"]);

    ctx.ballot()
        .args(["call", &address, "get_choice", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: \"D\""));
}

#[test]
fn test_command_from_environment_switch() {
    let ctx = TestContext::with_seed("frank");
    let address = ctx.deploy(["A", "B", "C", "D"]);

    ctx.ballot()
        .env("BALLOT_COMMAND", format!("state {}", address))
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL_VOTERS:0"));
}

#[test]
fn test_interactive_join_then_exit() {
    let ctx = TestContext::with_seed("gina");
    ctx.deploy(["A", "B", "C", "D"]);

    // join the recorded address, then pick the last menu entry (exit)
    ctx.ballot()
        .arg("interactive")
        .write_stdin("2\n\n5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Joined contract at address"))
        .stdout(predicate::str::contains("Goodbye!"));
}
