use assert_cmd::Command;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    home: PathBuf,
    data: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).expect("create isolated home");
        let data = tmp.path().join("store.json");
        Self {
            _tmp: tmp,
            home,
            data,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("podium").expect("binary builds");
        cmd.env("HOME", &self.home)
            .arg("--data")
            .arg(&self.data);
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    fn run_json_failure(&self, args: &[&str], code: i32) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }
}

fn days_ago(n: i64) -> String {
    (Utc::now().date_naive() - Duration::days(n)).to_string()
}

#[test]
fn rankings_end_to_end_scenario() {
    let env = TestEnv::new();

    let team = env.run_json(&["team", "add", "Alpha"]);
    assert_eq!(team["id"], 1);
    assert_eq!(team["name"], "Alpha");

    env.run_json(&["config", "set", "0.9"]);

    let old = env.run_json(&[
        "test", "add", "--team", "1", "--score", "80", "--date", &days_ago(14),
    ]);
    assert_eq!(old["lambda_value"], 0.9);
    env.run_json(&[
        "test", "add", "--team", "1", "--score", "90", "--date", &days_ago(0),
    ]);

    let rankings = env.run_json(&["rankings"]);
    let entry = &rankings[0];
    assert_eq!(entry["name"], "Alpha");
    assert_eq!(entry["position"], 1);
    assert_eq!(entry["test_count"], 2);
    // 0.1 * (0.9^2 * 80 + 90) = 15.48
    let score = entry["weighted_score"].as_f64().unwrap();
    assert!((score - 15.48).abs() < 1e-9, "got {}", score);
}

#[test]
fn rankings_sort_and_positions_are_dense() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Bravo"]);
    env.run_json(&["team", "add", "Alpha"]);
    env.run_json(&["team", "add", "Charlie"]);

    let today = days_ago(0);
    env.run_json(&["test", "add", "--team", "1", "--score", "90", "--date", &today]);
    env.run_json(&["test", "add", "--team", "2", "--score", "50", "--date", &today]);
    env.run_json(&["test", "add", "--team", "3", "--score", "50", "--date", &today]);

    let rankings = env.run_json(&["rankings"]);
    let names: Vec<&str> = rankings
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    // Bravo wins; Alpha and Charlie tie on score and break by name
    assert_eq!(names, vec!["Bravo", "Alpha", "Charlie"]);
    let positions: Vec<i64> = rankings
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn duplicate_test_tuple_is_a_conflict() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Alpha"]);
    let date = days_ago(1);
    env.run_json(&["test", "add", "--team", "1", "--score", "80", "--date", &date]);

    let err = env.run_json_failure(
        &["test", "add", "--team", "1", "--score", "95", "--date", &date],
        3,
    );
    assert!(err["error"].as_str().unwrap().contains("already recorded"));

    // Store is unchanged after the failed call
    let tests = env.run_json(&["team", "tests", "1"]);
    assert_eq!(tests["tests"].as_array().unwrap().len(), 1);
    assert_eq!(tests["tests"][0]["score"], 80.0);
}

#[test]
fn deleting_a_team_cascades_only_its_tests() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Alpha"]);
    env.run_json(&["team", "add", "Bravo"]);
    env.run_json(&["test", "add", "--team", "1", "--score", "80", "--date", &days_ago(7)]);
    env.run_json(&["test", "add", "--team", "1", "--score", "85", "--date", &days_ago(1)]);
    env.run_json(&["test", "add", "--team", "2", "--score", "70", "--date", &days_ago(1)]);

    let out = env.run_json(&["team", "rm", "1"]);
    assert_eq!(out["message"], "Team 'Alpha' deleted successfully");

    // Alpha is gone along with its tests; Bravo's test is untouched
    env.run_json_failure(&["team", "tests", "1"], 2);
    let remaining = env.run_json(&["team", "tests", "2"]);
    assert_eq!(remaining["tests"].as_array().unwrap().len(), 1);

    let rankings = env.run_json(&["rankings"]);
    assert_eq!(rankings.as_array().unwrap().len(), 1);
    assert_eq!(rankings[0]["name"], "Bravo");
}

#[test]
fn discipline_delete_is_guarded_not_cascaded() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Alpha"]);
    let hoop = env.run_json(&["discipline", "add", "Hoop"]);
    assert_eq!(hoop["id"], 1);

    env.run_json(&[
        "test", "add", "--team", "1", "--discipline", "1", "--score", "80", "--date",
        &days_ago(1),
    ]);

    let count = env.run_json(&["discipline", "test-count", "1"]);
    assert_eq!(count["test_count"], 1);

    let err = env.run_json_failure(&["discipline", "rm", "1"], 3);
    assert_eq!(
        err["error"],
        "Cannot delete discipline with associated tests"
    );

    // Removing the team cascades the test away; the guard then lifts
    env.run_json(&["team", "rm", "1"]);
    let out = env.run_json(&["discipline", "rm", "1"]);
    assert_eq!(out["message"], "Discipline 'Hoop' deleted successfully");
}

#[test]
fn discipline_rename_flow() {
    let env = TestEnv::new();
    env.run_json(&["discipline", "add", "Hop"]);
    env.run_json(&["discipline", "add", "Ball"]);

    let out = env.run_json(&["discipline", "rename", "1", "Hoop"]);
    assert_eq!(out["name"], "Hoop");

    env.run_json_failure(&["discipline", "rename", "1", "Ball"], 3);
    env.run_json_failure(&["discipline", "rename", "9", "Ring"], 2);
}

#[test]
fn config_bounds_are_enforced() {
    let env = TestEnv::new();

    // Default applies before any set
    let config = env.run_json(&["config", "get"]);
    assert_eq!(config["global_lambda"], 0.95);

    let err = env.run_json_failure(&["config", "set", "0.05"], 1);
    assert_eq!(err["error"], "Lambda must be between 0.1 and 1.0");
    env.run_json_failure(&["config", "set", "1.5"], 1);

    env.run_json(&["config", "set", "0.5"]);
    let config = env.run_json(&["config", "get"]);
    assert_eq!(config["global_lambda"], 0.5);
}

#[test]
fn empty_team_name_is_rejected() {
    let env = TestEnv::new();
    let err = env.run_json_failure(&["team", "add", "   "], 1);
    assert_eq!(err["error"], "Team name is required");
}

#[test]
fn duplicate_team_name_is_a_conflict() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Alpha"]);
    let err = env.run_json_failure(&["team", "add", "Alpha"], 3);
    assert_eq!(err["error"], "Team name already exists");
}

#[test]
fn missing_team_is_not_found() {
    let env = TestEnv::new();
    env.run_json_failure(&["team", "rm", "99"], 2);
    let err = env.run_json_failure(
        &["test", "add", "--team", "99", "--score", "80", "--date", &days_ago(0)],
        2,
    );
    assert_eq!(err["error"], "Team not found");
}

#[test]
fn state_persists_across_invocations() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Alpha"]);
    env.run_json(&["config", "set", "0.8"]);

    // Each CLI call reopens the store from disk
    let teams = env.run_json(&["team", "list"]);
    assert_eq!(teams[0]["name"], "Alpha");
    let config = env.run_json(&["config", "get"]);
    assert_eq!(config["global_lambda"], 0.8);
}

#[test]
fn team_list_is_ordered_by_name() {
    let env = TestEnv::new();
    env.run_json(&["team", "add", "Charlie"]);
    env.run_json(&["team", "add", "Alpha"]);

    let teams = env.run_json(&["team", "list"]);
    assert_eq!(teams[0]["name"], "Alpha");
    assert_eq!(teams[1]["name"], "Charlie");
}
