//! Opens documents through scripted launchers.
//!
//! Kept to a single test: writing a script and executing it while another
//! test thread forks can fail with ETXTBSY.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn docopener(launcher: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("docopener");
    cmd.arg("--log-level")
        .arg("error")
        .arg("--launch-grace-ms")
        .arg("2000")
        .arg("--launcher")
        .arg(launcher);
    cmd
}

#[test]
fn open_through_launcher_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("valid.csv");
    let pdf = dir.path().join("valid.pdf");
    std::fs::write(&csv, b"a,b\n1,2\n").unwrap();
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();

    let opens = script(dir.path(), "opens", "exit 0");
    let no_viewer = script(dir.path(), "no-viewer", "exit 3");
    let refuses = script(dir.path(), "refuses", "exit 1");

    docopener(&opens)
        .arg("open")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"type":"done","message":"File opened successfully"}"#,
        ));

    docopener(&no_viewer)
        .arg("--no-preview")
        .arg("open")
        .arg(&pdf)
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            r#"{"type":"noAppToOpen","message":"No app found to open this file type"}"#,
        ));

    docopener(&refuses)
        .arg("open")
        .arg(&csv)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            r#"{"type":"error","message":"Could not open file"}"#,
        ));

    let args = serde_json::json!({ "file_path": csv }).to_string();
    docopener(&opens)
        .arg("call")
        .arg("openDocument")
        .arg("--args")
        .arg(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"done""#));
}
