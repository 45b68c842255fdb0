use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/scenarios/descents.yaml")
}

fn descent() -> Command {
    let mut cmd = Command::cargo_bin("descent").expect("descent binary");
    cmd.arg("--scenarios").arg(catalog());
    cmd
}

#[test]
fn prints_replay_summary() {
    descent()
        .args(["--name", "mk16_descent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scenario        : MK16_DESCENT"))
        .stdout(predicate::str::contains("STOWED -> PREDEPLOYED"))
        .stdout(predicate::str::contains("Final state     : main = STOWED"));
}

#[test]
fn describe_prints_chute_parameters() {
    descent()
        .args(["--name", "CUT_AND_REPACK", "--describe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== main ==="))
        .stdout(predicate::str::contains("Deployed diameter: 25m"))
        .stdout(predicate::str::contains("Cost: 37"));
}

#[test]
fn writes_telemetry_and_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("run.csv");
    descent()
        .args(["--name", "CUT_AND_REPACK", "--dt", "0.5"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("run_summary.json"));

    let mut reader = csv::Reader::from_path(&output).expect("telemetry csv");
    let rows = reader.records().map(|r| r.expect("row")).count();
    // 30 s at 0.5 s steps, inclusive of both ends.
    assert_eq!(rows, 61);

    let summary = std::fs::read_to_string(dir.path().join("run_summary.json")).expect("summary");
    assert!(summary.contains("\"scenario\": \"CUT_AND_REPACK\""));
    assert!(summary.contains("generated_utc"));
}

#[test]
fn csv_to_stdout_suppresses_report() {
    descent()
        .args(["--name", "CUT_AND_REPACK", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("time_s,chute,state"))
        .stdout(predicate::str::contains("=== Descent Replay ===").not());
}

#[test]
fn unknown_scenario_fails() {
    descent()
        .args(["--name", "APOLLO"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("APOLLO"));
}

#[test]
fn rejects_non_positive_time_step() {
    descent()
        .args(["--dt", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("time step must be positive"));
}
