//! Integration tests for the Assessor CLI.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Runs the binary inside `dir` so no stray config file is picked up.
fn assessor_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("assessor").expect("binary is built");
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    assessor_in(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("assessor"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    assessor_in(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("strategies"));
}

#[test]
fn test_strategies_command() {
    let dir = TempDir::new().unwrap();
    assessor_in(&dir)
        .arg("strategies")
        .assert()
        .success()
        .stdout(predicate::str::contains("rule_based"))
        .stdout(predicate::str::contains("peer_review"))
        .stdout(predicate::str::contains("ml"));
}

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    assessor_in(&dir)
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("initialized"));

    let config_path = dir.path().join("assessor.toml");
    assert!(config_path.exists(), "assessor.toml should be created");

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[cache]"));
    assert!(content.contains("ttl_secs = 3600"));
}

#[test]
fn test_init_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("assessor.toml");
    fs::write(&config_path, "# mine\n").unwrap();

    assessor_in(&dir)
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine\n");
}

#[test]
fn test_evaluate_json_report() {
    let dir = TempDir::new().unwrap();
    let paper = dir.path().join("quantum.txt");
    fs::write(
        &paper,
        "Abstract: quantum error correction. Methodology: simulation. Results: good data.",
    )
    .unwrap();

    let output = assessor_in(&dir)
        .args(["--quiet", "evaluate", "--file"])
        .arg(&paper)
        .args(["--id", "S003", "--strategy", "ml", "--repeat", "2"])
        .args(["--latency-ms", "0", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["strategy"], "ML-Based Evaluation");
    assert_eq!(report["chain"], "logging -> cache -> strategy");
    assert_eq!(report["submission_id"], "S003");

    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["is_cached"], false);
    assert_eq!(results[1]["is_cached"], true);
    assert_eq!(results[0]["score"], results[1]["score"]);

    assert_eq!(report["cache"]["hits"], 1);
    assert_eq!(report["cache"]["misses"], 1);
    assert_eq!(report["audit"].as_array().unwrap().len(), 2);
}

#[test]
fn test_evaluate_text_output() {
    let dir = TempDir::new().unwrap();

    assessor_in(&dir)
        .args(["--quiet", "evaluate", "--content", "Abstract: short. Results: fine."])
        .args(["--strategy", "rule_based", "--latency-ms", "0", "--repeat", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[CACHED]"))
        .stdout(predicate::str::contains("Hits:      1"));
}

#[test]
fn test_evaluate_honors_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("assessor.toml"),
        "[strategy]\nkind = \"rule_based\"\nlatency_ms = 0\n\n[cache]\nenabled = false\n",
    )
    .unwrap();

    let output = assessor_in(&dir)
        .args(["--quiet", "evaluate", "--content", "Abstract: x.", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["strategy"], "Rule-Based Evaluation");
    assert_eq!(report["chain"], "logging -> strategy");
    assert!(report["cache"].is_null());
}

#[test]
fn test_evaluate_rejects_negative_ttl() {
    let dir = TempDir::new().unwrap();

    assessor_in(&dir)
        .args(["evaluate", "--content", "Abstract: x.", "--ttl", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ttl"));
}

#[test]
fn test_evaluate_rejects_unknown_strategy() {
    let dir = TempDir::new().unwrap();

    assessor_in(&dir)
        .args(["evaluate", "--content", "Abstract: x.", "--strategy", "oracle"])
        .assert()
        .failure();
}

#[test]
fn test_evaluate_rejects_out_of_range_repeat() {
    let dir = TempDir::new().unwrap();

    for repeat in ["0", "18446744073709551615"] {
        assessor_in(&dir)
            .args(["evaluate", "--content", "x.", "--latency-ms", "0", "--repeat", repeat])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("--repeat"));
    }
}

#[test]
fn test_evaluate_requires_input() {
    let dir = TempDir::new().unwrap();

    assessor_in(&dir)
        .args(["evaluate", "--latency-ms", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file or --content"));
}
