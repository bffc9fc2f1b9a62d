use assert_cmd::Command;
use predicates::prelude::*;

fn maestro(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("maestro").unwrap();
    cmd.env("MAESTRO_DATA_DIR", dir.join("data"))
        .env("HOME", dir)
        .current_dir(dir);
    cmd
}

#[test]
fn test_template_writes_expected_csv() {
    let dir = tempfile::tempdir().unwrap();
    maestro(dir.path())
        .args(["template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Template written"));

    let content = std::fs::read_to_string(dir.path().join("stats-import-template.csv")).unwrap();
    assert!(content
        .starts_with("worker_account_email,project_code,work_date,units_completed,hours_worked"));
    assert!(content.contains("worker1@example.com,atlas,2025-11-10,120,8.5"));
    assert!(content.contains("worker2@example.com,beacon,2025-11-10,95,7.0"));
}

#[test]
fn test_demo_template_import_flow() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();

    maestro(dir.path()).args(["demo"]).assert().success();
    maestro(dir.path()).args(["template"]).assert().success();

    maestro(dir.path())
        .args(["import", "stats-import-template.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 inserted, 0 skipped"));

    // same file again is refused by the checksum ledger
    maestro(dir.path())
        .args(["import", "stats-import-template.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already been imported"));

    maestro(dir.path())
        .args(["stats", "--project", "atlas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work stats (1)"));
}

#[test]
fn test_import_refuses_unknown_references() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    maestro(dir.path()).args(["demo"]).assert().success();

    let csv = "worker_account_email,project_code,work_date,units_completed,hours_worked\n\
               ghost@example.com,atlas,2025-11-10,10,1\n";
    std::fs::write(dir.path().join("bad.csv"), csv).unwrap();

    maestro(dir.path())
        .args(["import", "bad.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown worker_account_email"))
        .stdout(predicate::str::contains("Import refused"));
}

#[test]
fn test_validate_only_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    maestro(dir.path()).args(["demo"]).assert().success();
    maestro(dir.path()).args(["template"]).assert().success();

    maestro(dir.path())
        .args(["import", "stats-import-template.csv", "--validate-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 rows ready to import."));

    maestro(dir.path())
        .args(["stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work stats (0)"));
}

#[test]
fn test_status_without_database() {
    let dir = tempfile::tempdir().unwrap();
    maestro(dir.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database not found"));
}
