#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_queued_transaction_survives_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("payments_db");

    // 1. First run: submit a payment that routes to the manual queue.
    let output = Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args([
            "submit", "--amount", "15000", "--method", "bank_transfer", "--booking", "bk-p",
            "--user", "usr-1",
        ])
        .output()
        .expect("failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let row = stdout.lines().nth(1).expect("expected a transaction row");
    let id = row.split(',').next().unwrap().to_string();
    assert!(row.contains("requires_verification"));

    // 2. Second run: the queue is recovered from disk.
    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains(&id));

    // 3. Third run: an admin resolves it.
    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["verify", &id, "--admin", "admin1", "--approve", "--notes", "checked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("verified"));

    // 4. Fourth run: the terminal state is retained for the booking.
    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["booking", "bk-p"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id))
        .stdout(predicate::str::contains("verified"));

    // 5. Fifth run: a receipt renders from the final snapshot.
    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["receipt", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("RECEIPT {id}")))
        .stdout(predicate::str::contains("BookPay Travel"))
        .stdout(predicate::str::contains("verified"));

    // A second verify on the same id must fail: the state is terminal.
    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["verify", &id, "--admin", "admin1", "--reject"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot transition"));
}

#[test]
fn test_settings_survive_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("settings_db");

    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["settings", "set", "--mode", "manual", "--disable", "cash"])
        .assert()
        .success();

    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"processing_mode\": \"manual\""))
        .stdout(predicate::str::contains("\"cash\"").not());

    // Routing now follows the persisted manual mode.
    Command::new(cargo_bin!("bookpay"))
        .arg("--db-path")
        .arg(&db_path)
        .args([
            "submit", "--amount", "5", "--method", "credit_card", "--booking", "bk-s", "--user",
            "usr-1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("requires_verification,manual"));
}
