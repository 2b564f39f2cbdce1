//! End-to-end tests for the hydrodb binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn hydrodb() -> Command {
    Command::cargo_bin("hydrodb").unwrap()
}

#[test]
fn init_creates_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("model.db");

    hydrodb()
        .arg("init")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlite:///"));
    assert!(db.exists());
}

#[test]
fn drop_tolerates_a_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    hydrodb()
        .arg("drop")
        .arg(dir.path().join("absent.db"))
        .assert()
        .success();
}

#[test]
fn store_then_export_round_trips_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("model.db");
    let input = dir.path().join("precip.gag");
    let output = dir.path().join("precip-out.gag");
    let content = "EVENT \"storm 1\"\r\nNRGAG 2\nNRPDS 14\n";
    std::fs::write(&input, content).unwrap();

    hydrodb().arg("init").arg(&db).assert().success();

    hydrodb()
        .arg("store")
        .arg("--database")
        .arg(&db)
        .arg(&input)
        .arg("--project")
        .arg("run1")
        .assert()
        .success()
        .stdout(predicate::str::contains("stored 'precip'"));

    hydrodb()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("precip")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(std::fs::read(&output).unwrap(), content.as_bytes());

    hydrodb()
        .arg("ls")
        .arg("--database")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("precip.gag"));
}

#[test]
fn export_of_an_unknown_name_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("model.db");
    hydrodb().arg("init").arg(&db).assert().success();

    hydrodb()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("nothing")
        .arg(dir.path().join("out.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no stored file named"));
}
