use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Command with a scratch config and database so runs never touch user files.
fn invex(scratch: &Path) -> Command {
    let config = scratch.join("config.json");
    std::fs::write(
        &config,
        r#"{"model": {"base_url": "http://127.0.0.1:9/v1"}}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("invex").unwrap();
    cmd.env("INVEX_CONFIG", &config)
        .env("INVEX_DATABASE", scratch.join("invoices.db"))
        .env_remove("INVEX_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_argument_prints_usage() {
    let scratch = tempfile::tempdir().unwrap();
    invex(scratch.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_path_is_reported() {
    let scratch = tempfile::tempdir().unwrap();
    let missing = scratch.path().join("missing");

    invex(scratch.path())
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not exist"));

    assert!(!scratch.path().join("invoices.db").exists());
}

#[test]
fn test_non_pdf_file_is_rejected() {
    let scratch = tempfile::tempdir().unwrap();
    let notes = scratch.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();

    invex(scratch.path())
        .arg(&notes)
        .assert()
        .success()
        .stderr(predicate::str::contains("is not a PDF file"));
}

#[test]
fn test_directory_without_pdfs() {
    let scratch = tempfile::tempdir().unwrap();
    let inbox = scratch.path().join("inbox");
    std::fs::create_dir(&inbox).unwrap();
    std::fs::write(inbox.join("readme.md"), "nothing here").unwrap();

    invex(scratch.path())
        .arg(&inbox)
        .assert()
        .success()
        .stderr(predicate::str::contains("no PDF files found"));

    assert!(!scratch.path().join("invoices.db").exists());
}

#[test]
fn test_unreadable_pdf_does_not_fail_batch() {
    let scratch = tempfile::tempdir().unwrap();
    let inbox = scratch.path().join("inbox");
    std::fs::create_dir(&inbox).unwrap();
    std::fs::write(inbox.join("broken.pdf"), "not really a pdf").unwrap();

    invex(scratch.path())
        .arg(&inbox)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 PDF files"))
        .stdout(predicate::str::contains("broken.pdf"))
        .stdout(predicate::str::contains("0 successful, 1 failed"));

    assert!(scratch.path().join("invoices.db").exists());
}

#[test]
fn test_bad_config_file_fails() {
    let scratch = tempfile::tempdir().unwrap();
    let inbox = scratch.path().join("inbox");
    std::fs::create_dir(&inbox).unwrap();
    std::fs::write(inbox.join("a.pdf"), "x").unwrap();
    let config = scratch.path().join("broken.json");
    std::fs::write(&config, "{ not json").unwrap();

    invex(scratch.path())
        .env("INVEX_CONFIG", &config)
        .arg(&inbox)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}
