//! Smoke tests for the `commonthread` binary.
#![cfg(feature = "cli")]

use std::process::Command;

fn commonthread() -> Command {
    Command::new(env!("CARGO_BIN_EXE_commonthread"))
}

#[test]
fn help_lists_every_command() {
    let output = commonthread().arg("--help").output().expect("run binary");
    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "signup", "logout", "status", "request", "chat", "stories"] {
        assert!(help.contains(command), "missing {command} in:\n{help}");
    }
}

#[test]
fn status_without_credentials_reports_logged_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = commonthread()
        .arg("status")
        .env("COMMONTHREAD_CREDENTIALS_DIR", dir.path())
        .env("COMMONTHREAD_BASE_URL", "http://127.0.0.1:9")
        .output()
        .expect("run binary");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Not logged in");
}
