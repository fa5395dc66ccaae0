//! End-to-end tests for the sprig binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn sprig() -> Command {
    let mut cmd = Command::cargo_bin("sprig").expect("Failed to find sprig binary");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn write(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn chain_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        &[
            ("src/a.ts", "import { b } from './b';\nimport React from 'react';"),
            ("src/b.ts", "import { c } from './c';"),
            ("src/c.ts", "export const c = 1;"),
            ("src/shared.ts", "export const s = 1;"),
            ("src/x.ts", "import { s } from './shared';"),
            ("src/y.ts", "import { s } from './shared';"),
        ],
    );
    temp
}

#[test]
fn test_help_lists_commands() {
    sprig()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("select"))
        .stdout(predicate::str::contains("imports"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_imports_prints_json() {
    let temp = chain_project();

    sprig()
        .arg("imports")
        .arg(temp.path().join("src/a.ts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"./b\""))
        .stdout(predicate::str::contains("\"react\""))
        .stdout(predicate::str::contains("static-import"));
}

#[test]
fn test_imports_missing_file_fails() {
    sprig()
        .args(["imports", "does/not/exist.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_analyze_json_respects_depth() {
    let temp = chain_project();

    let output = sprig()
        .args(["analyze", "src/a.ts", "--depth", "1", "--json", "--project"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let nodes = graph["nodes"].as_object().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(graph["status"], "complete");
}

#[test]
fn test_analyze_prints_summary() {
    let temp = chain_project();

    sprig()
        .args(["analyze", "src/a.ts", "--project"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("depth 2"))
        .stdout(predicate::str::contains("src/c.ts"))
        .stderr(predicate::str::contains("3 files, 2 edges"));
}

#[test]
fn test_analyze_rejects_root_outside_project() {
    let temp = chain_project();

    sprig()
        .args(["analyze", "../elsewhere.ts", "--project"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the project root"));
}

#[test]
fn test_select_keeps_shared_dependency() {
    let temp = chain_project();

    let output = sprig()
        .args(["select", "src/x.ts", "src/y.ts", "--deselect", "src/x.ts", "--project"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["action"], "select");
    assert_eq!(lines[0]["update"]["added"].as_array().unwrap().len(), 1);
    assert_eq!(lines[1]["update"]["added"].as_array().unwrap().len(), 0);
    assert_eq!(lines[2]["action"], "deselect");
    assert_eq!(lines[2]["update"]["removed"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_reports_out_of_range_depth() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), &[("sprig.toml", "maxDepth = 30\n")]);

    sprig()
        .args(["check", "--project"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_check_prints_effective_settings() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        &[("package.json", r#"{ "name": "app", "sprig": { "enabled": true, "maxDepth": "unlimited" } }"#)],
    );

    sprig()
        .args(["check", "--project"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxDepth\": \"unlimited\""))
        .stderr(predicate::str::contains("Settings are valid"));
}
