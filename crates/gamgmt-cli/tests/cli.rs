//! cli.rs
//!
//! Runs the `gamgmt` binary in offline mode against the shared fixtures.

use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn gamgmt() -> Command {
    let mut cmd = Command::cargo_bin("gamgmt").unwrap();
    cmd.env_remove("GAMGMT_ACCESS_TOKEN").env_remove("GAMGMT_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn accounts_json_lists_every_account() {
    let v = json_stdout(
        gamgmt()
            .args(["accounts", "--json", "--summaries"])
            .arg(fixture("account_summaries.json")),
    );
    let ids: Vec<&str> = v.as_array().unwrap().iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["1001", "1002", "1003", "1005", "1006"]);
}

#[test]
fn accounts_tree_shows_names() {
    let out = gamgmt()
        .args(["accounts", "--summaries"])
        .arg(fixture("account_summaries.json"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Account A"));
    assert!(text.contains("WebProperty D.A (View-less)"));
    assert!(text.contains("Profile B.A.A"));
}

#[test]
fn lookup_view_reports_ancestors() {
    let v = json_stdout(
        gamgmt()
            .args(["lookup", "--json", "--view-id", "2006", "--summaries"])
            .arg(fixture("account_summaries.json")),
    );
    assert_eq!(v["level"], "profile");
    assert_eq!(v["name"], "Profile A.B.C");
    assert_eq!(v["propertyId"], "UA-1001-2");
    assert_eq!(v["accountId"], "1001");
}

#[test]
fn lookup_property_synonym() {
    let v = json_stdout(
        gamgmt()
            .args(["lookup", "--json", "--property-id", "UA-1003-1", "--summaries"])
            .arg(fixture("account_summaries.json")),
    );
    assert_eq!(v["level"], "webProperty");
    assert_eq!(v["name"], "WebProperty C.A");
    assert_eq!(v["accountId"], "1003");
}

#[test]
fn lookup_with_two_ids_is_ambiguous() {
    let out = gamgmt()
        .args(["lookup", "--account-id", "1001", "--profile-id", "2001", "--summaries"])
        .arg(fixture("account_summaries.json"))
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&out).contains("single selector key"));
}

#[test]
fn lookup_unknown_id_fails() {
    gamgmt()
        .args(["lookup", "--view-id", "9999", "--summaries"])
        .arg(fixture("account_summaries.json"))
        .assert()
        .failure();
}

fn offline_columns() -> Command {
    let mut cmd = gamgmt();
    cmd.args(["columns", "--json", "--columns"])
        .arg(fixture("metadata_columns.json"))
        .arg("--custom-metrics")
        .arg(fixture("custom_metrics.json"))
        .arg("--custom-dimensions")
        .arg(fixture("custom_dimensions.json"))
        .arg("--goals")
        .arg(fixture("goals.json"));
    cmd
}

#[test]
fn columns_expand_offline() {
    let v = json_stdout(&mut offline_columns());
    let cols = v.as_array().unwrap();
    assert_eq!(cols.len(), 23);
    assert!(cols.iter().all(|c| !c["id"].as_str().unwrap().contains("XX")));

    let metric = cols.iter().find(|c| c["id"] == "ga:metric2").unwrap();
    assert_eq!(metric["attributes"]["uiName"], "Cost (Custom Metric 2)");
}

#[test]
fn columns_premium_bounds() {
    let v = json_stdout(offline_columns().arg("--premium"));
    assert_eq!(v.as_array().unwrap().len(), 68);
}

#[test]
fn raw_metrics_with_filter() {
    let v = json_stdout(
        gamgmt()
            .args(["columns", "--json", "--raw", "--metrics", "--where", "status=PUBLIC", "--columns"])
            .arg(fixture("metadata_columns.json")),
    );
    let ids: Vec<&str> = v.as_array().unwrap().iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        ["ga:metricXX", "ga:goalXXCompletions", "ga:goalCompletionsAll", "ga:users", "ga:sessions"]
    );
}

#[test]
fn malformed_filter_is_rejected() {
    gamgmt()
        .args(["columns", "--where", "status", "--columns"])
        .arg(fixture("metadata_columns.json"))
        .assert()
        .failure();
}

#[test]
fn custom_file_requires_columns() {
    gamgmt()
        .args(["columns", "--goals"])
        .arg(fixture("goals.json"))
        .assert()
        .failure();
}

#[test]
fn view_id_conflicts_with_offline_columns() {
    gamgmt()
        .args(["columns", "--view-id", "2001", "--columns"])
        .arg(fixture("metadata_columns.json"))
        .assert()
        .failure();
}

#[test]
fn raw_conflicts_with_expansion_inputs() {
    gamgmt()
        .args(["columns", "--raw", "--premium", "--columns"])
        .arg(fixture("metadata_columns.json"))
        .assert()
        .failure();
    gamgmt()
        .args(["columns", "--raw", "--columns"])
        .arg(fixture("metadata_columns.json"))
        .arg("--goals")
        .arg(fixture("goals.json"))
        .assert()
        .failure();
}

#[test]
fn summaries_file_may_be_bare_items() {
    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(fixture("account_summaries.json")).unwrap()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.json");
    std::fs::write(&path, serde_json::to_string(&raw["items"]).unwrap()).unwrap();

    let v = json_stdout(gamgmt().args(["lookup", "--json", "--view-id", "2010", "--summaries"]).arg(&path));
    assert_eq!(v["name"], "Profile B.A.A");
}
