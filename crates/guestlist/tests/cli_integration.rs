//! CLI integration tests for the guestlist command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Invalid inputs are rejected with appropriate messages
//! - Form drafts persist between runs
//!
//! None of these need a running server: they stop at parsing, local
//! validation, or the draft file.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the guestlist binary with an isolated config dir.
fn guestlist(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("guestlist").unwrap();
    cmd.arg("--config-dir")
        .arg(config_dir.path())
        .env_remove("GUESTLIST_SERVER_URL")
        .env_remove("GUESTLIST_ADMIN_EMAIL")
        .env_remove("GUESTLIST_ADMIN_PASSWORD");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("console for event guests"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("guestlist"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("whoami"))
        .stdout(predicate::str::contains("forgot-password"))
        .stdout(predicate::str::contains("guests"))
        .stdout(predicate::str::contains("accompanies"))
        .stdout(predicate::str::contains("invitation"))
        .stdout(predicate::str::contains("drafts"))
        .stdout(predicate::str::contains("console"));
}

#[test]
fn test_logout_is_console_only() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .arg("logout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_guests_help_lists_actions() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args(["guests", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("export"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Parsing Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_sort_column_is_rejected() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args(["guests", "list", "--sort", "age"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'age'"));
}

#[test]
fn test_desc_requires_sort() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args(["guests", "list", "--desc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sort"));
}

#[test]
fn test_description_flags_conflict() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args([
            "guests",
            "add",
            "--description",
            "<p>hi</p>",
            "--description-file",
            "welcome.html",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_malformed_accompany_is_rejected() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args(["invitation", "register", "tok", "--accompany", "Ravi,ravi@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name,email,mobile"));
}

#[test]
fn test_missing_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir).assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Draft Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_drafts_list_empty() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args(["drafts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts saved"));
}

#[test]
fn test_drafts_show_missing_fails() {
    let dir = TempDir::new().unwrap();
    guestlist(&dir)
        .args(["drafts", "show", "add-guest-form"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No draft saved for 'add-guest-form'"));
}

#[test]
fn test_invalid_guest_is_kept_as_draft() {
    let dir = TempDir::new().unwrap();

    guestlist(&dir)
        .args(["guests", "add", "--name", "Asha Rao", "--mobile", "12ab34cd90"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Email is required."))
        .stderr(predicate::str::contains("Mobile number must contain only digits."));

    guestlist(&dir)
        .args(["--json", "drafts", "show", "add-guest-form"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Asha Rao\""))
        .stdout(predicate::str::contains("\"mobile\": \"12ab34cd90\""));

    // The saved name fills in for the missing flag on the next attempt.
    guestlist(&dir)
        .args(["guests", "add", "--mobile", "98765"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Resuming draft"))
        .stderr(predicate::str::contains("Name is required.").not());

    guestlist(&dir)
        .args(["drafts", "clear", "add-guest-form"])
        .assert()
        .success()
        .stdout(predicate::str::contains("discarded"));

    guestlist(&dir)
        .args(["drafts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts saved"));
}

#[test]
fn test_no_draft_flag_skips_saving() {
    let dir = TempDir::new().unwrap();

    guestlist(&dir)
        .args(["guests", "add", "--name", "Asha Rao", "--no-draft"])
        .assert()
        .failure();

    guestlist(&dir)
        .args(["drafts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No drafts saved"));
}
