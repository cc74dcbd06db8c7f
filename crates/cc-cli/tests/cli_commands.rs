//! Integration tests for the cc-cli binary.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DATABASE: &str = r#"{
    "max_level": 99,
    "classes": [
        {
            "id": 1,
            "name": "Warrior",
            "curve": { "basis": 25, "extra": 20, "acceleration_a": 30, "acceleration_b": 30 },
            "params": [[0, 100, 120, 140, 160, 180, 200], [0, 10, 12, 14, 16, 18, 20]],
            "learnings": [{ "level": 1, "skill": 1 }, { "level": 5, "skill": 2 }],
            "skill_types": [1]
        },
        {
            "id": 2,
            "name": "Mage",
            "params": [[0, 80, 90, 100, 110, 120], [0, 50, 60, 70, 80, 90]],
            "learnings": [{ "level": 1, "skill": 3 }],
            "skill_types": [2]
        },
        {
            "id": 3,
            "name": "Paladin",
            "curve": { "basis": 40, "extra": 30, "acceleration_a": 40, "acceleration_b": 20 },
            "params": [[0, 150, 180], [0, 20, 25]],
            "note": "<LaziLearnableClassAND:|1,5||2,3|>"
        }
    ],
    "skills": [
        { "id": 1, "name": "Slash", "skill_type": 1 },
        { "id": 2, "name": "Cleave", "skill_type": 1 },
        { "id": 3, "name": "Fire", "skill_type": 2 },
        { "id": 10, "name": "Focus", "skill_type": 1 }
    ],
    "actors": [
        { "id": 1, "name": "Harold", "class_id": 1 },
        { "id": 2, "name": "Therese", "class_id": 1, "note": "<LaziGiveClass: 2>\n<LaziInnateSkill:10,5>" }
    ]
}"#;

/// Write `contents` to `name` inside `dir` and return the path as a string.
fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    let path: PathBuf = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path.to_str().unwrap().to_string()
}

fn test_db() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let db = write(&dir, "db.json", DATABASE);
    (dir, db)
}

fn classchange() -> Command {
    let mut cmd = Command::cargo_bin("classchange").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ---------------------------------------------------------------------------
// curve / level
// ---------------------------------------------------------------------------

#[test]
fn curve_prints_experience_table() {
    let (_dir, db) = test_db();
    classchange()
        .args(["curve", &db, "--class", "1", "--to", "10"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Warrior")
                .and(predicate::str::contains("4443"))
                .and(predicate::str::contains("1000")),
        );
}

#[test]
fn curve_unknown_class_fails() {
    let (_dir, db) = test_db();
    classchange()
        .args(["curve", &db, "--class", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("class not found: class#9"));
}

#[test]
fn level_round_trips_table_value() {
    let (_dir, db) = test_db();
    classchange()
        .args(["level", &db, "--class", "1", "--exp", "4443"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level 10"));
}

#[test]
fn level_of_zero_experience_is_one() {
    let (_dir, db) = test_db();
    classchange()
        .args(["level", &db, "--class", "1", "--exp", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level 1").and(predicate::str::contains("45 exp to level 2")));
}

#[test]
fn missing_database_fails() {
    classchange()
        .args(["level", "/nonexistent/db.json", "--class", "1", "--exp", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_database() {
    let (_dir, db) = test_db();
    classchange()
        .args(["check", &db])
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed").and(predicate::str::contains("3 classes")));
}

#[test]
fn check_fails_on_dangling_class() {
    let dir = TempDir::new().unwrap();
    let db = write(
        &dir,
        "db.json",
        r#"{ "classes": [], "actors": [{ "id": 1, "name": "Lost", "class_id": 5 }] }"#,
    );
    classchange()
        .args(["check", &db])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist").and(predicate::str::contains("check failed")));
}

#[test]
fn check_warns_on_annotation_problems() {
    let dir = TempDir::new().unwrap();
    let db = write(
        &dir,
        "db.json",
        r#"{
            "classes": [{ "id": 1, "name": "Warrior" }],
            "actors": [{ "id": 1, "name": "Harold", "class_id": 1, "note": "<LaziGiveClass: 42>" }]
        }"#,
    );
    classchange()
        .args(["check", &db])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown class#42"));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

const SCENARIO: &str = r#"{
    "config": { "mode": { "type": "per_class" } },
    "steps": [
        { "gain_exp": { "actor": 2, "amount": 600 } },
        { "change_class": { "actor": 2, "class": 2 } },
        { "gain_exp": { "actor": 2, "amount": 200 } },
        { "modify_classes": { "actor": 1, "class": 1, "action": "remove" } },
        { "menu_access": { "access": "hidden" } }
    ]
}"#;

#[test]
fn run_replays_scenario() {
    let (dir, db) = test_db();
    let scenario = write(&dir, "scenario.json", SCENARIO);
    classchange()
        .args(["run", &db, &scenario])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Therese learned Focus")
                .and(predicate::str::contains("Therese unlocked Paladin"))
                .and(predicate::str::contains("Warrior -> Mage"))
                .and(predicate::str::contains("IGNORED"))
                .and(predicate::str::contains("Menu access: Hidden"))
                .and(predicate::str::contains("Menu entry: -")),
        );
}

#[test]
fn run_reports_configured_menu_entry() {
    let (dir, db) = test_db();
    let scenario = write(
        &dir,
        "scenario.json",
        r#"{
            "config": { "menu": { "label": "Job Change" } },
            "steps": [{ "menu_access": { "access": "disabled" } }]
        }"#,
    );
    classchange()
        .args(["run", &db, &scenario])
        .assert()
        .success()
        .stdout(predicate::str::contains("Menu entry: Job Change (not selectable)"));
}

#[test]
fn run_writes_save_state() {
    let (dir, db) = test_db();
    let scenario = write(&dir, "scenario.json", SCENARIO);
    let save = dir.path().join("save.json");
    classchange()
        .args(["run", &db, &scenario, "--save", save.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Save state written"));

    let saved = fs::read_to_string(&save).unwrap();
    assert!(saved.contains("\"ledger\""));
    assert!(saved.contains("\"menu_access\": \"hidden\""));
}

#[test]
fn run_fails_on_unknown_actor() {
    let (dir, db) = test_db();
    let scenario = write(
        &dir,
        "scenario.json",
        r#"{ "steps": [{ "gain_exp": { "actor": 7, "amount": 10 } }] }"#,
    );
    classchange()
        .args(["run", &db, &scenario])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step 1 failed"));
}

#[test]
fn run_rejects_malformed_scenario() {
    let (dir, db) = test_db();
    let scenario = write(&dir, "scenario.json", r#"{ "steps": [{ "jump": {} }] }"#);
    classchange()
        .args(["run", &db, &scenario])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scenario"));
}

#[test]
fn verbose_logs_engine_decisions() {
    let (dir, db) = test_db();
    let scenario = write(&dir, "scenario.json", SCENARIO);
    classchange()
        .args(["-v", "run", &db, &scenario])
        .assert()
        .success()
        .stderr(predicate::str::contains("class swapped"));
}
