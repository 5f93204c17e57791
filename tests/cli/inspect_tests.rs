use super::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_inspect_lists_generated_operations() {
    let ctx = TestContext::with_seed("inspector");
    ctx.ballot()
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("Contract: ballot"))
        .stdout(predicate::str::contains("vote_for(index: number) -> void [transaction]"))
        .stdout(predicate::str::contains("get_total_voters() -> number [query]"))
        .stdout(predicate::str::contains("total_voters"));
}

#[test]
fn test_inspect_json_keeps_declaration_order() {
    let ctx = TestContext::with_seed("inspector");
    let output = ctx.ballot().args(["inspect", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = json["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["vote_for", "get_total_voters", "get_vote_count", "get_choice"]
    );
    assert_eq!(json["operations"][0]["isReadOnly"], false);
    assert_eq!(json["contractName"], "ballot");
}

#[test]
fn test_read_only_list_comes_from_config() {
    let ctx = TestContext::with_seed("inspector");
    std::fs::write(
        ctx.temp_dir.path().join(".ballot.toml"),
        "[operations]\nread_only = [\"vote_for\"]\n",
    )
    .unwrap();
    ctx.ballot()
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("vote_for(index: number) -> void [query]"))
        .stdout(predicate::str::contains("get_total_voters() -> number [transaction]"));
}

#[test]
fn test_missing_contract_dir_is_an_extraction_error() {
    let ctx = TestContext::with_seed("inspector");
    ctx.ballot_with_contracts(&ctx.temp_dir.path().join("nowhere"))
        .arg("inspect")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR: Failed to extract contract interface"));
}
