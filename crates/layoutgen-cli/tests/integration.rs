//! Integration tests for CLI commands.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const FIXTURE_KEY_ID: &str = "70ca5750c2eda80b18f41f4ec5f92146789b5d68dd09577be422a0159bd13680";

fn test_key(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("layoutgen-crypto")
        .join("tests")
        .join("data")
        .join(name)
}

fn run_cli_in(dir: &Path, args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_layoutgen"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute command");

    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Working directory laid out like the fixture expects: `test/alice` holds a key.
fn fixture_dir(key: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("test")).unwrap();
    fs::copy(test_key(key), temp_dir.path().join("test").join("alice")).unwrap();
    temp_dir
}

#[test]
fn test_default_run_writes_root_layout() {
    let temp_dir = fixture_dir("bob");
    let (success, stdout, stderr) = run_cli_in(temp_dir.path(), &[]);

    assert!(success, "stderr: {}", stderr);
    assert!(stdout.contains("Generated"));

    let written: Value =
        serde_json::from_slice(&fs::read(temp_dir.path().join("root.layout")).unwrap()).unwrap();
    assert_eq!(written["signatures"].as_array().unwrap().len(), 1);
    assert_eq!(written["signed"]["expires"], "2021-03-17T00:13:15Z");
    assert!(written["signed"]["keys"].get(FIXTURE_KEY_ID).is_some());
}

#[test]
fn test_default_run_without_key_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let (success, _, stderr) = run_cli_in(temp_dir.path(), &[]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(!temp_dir.path().join("root.layout").exists());
}

#[test]
fn test_generate_with_explicit_paths() {
    let temp_dir = TempDir::new().unwrap();
    let key = test_key("bob");
    let (success, stdout, _) = run_cli_in(
        temp_dir.path(),
        &["generate", "--key", key.to_str().unwrap(), "--output", "custom.layout"],
    );

    assert!(success);
    assert!(stdout.contains("custom.layout"));
    assert!(temp_dir.path().join("custom.layout").exists());
    assert!(!temp_dir.path().join("root.layout").exists());
}

#[test]
fn test_verify_reports_undeclared_signer() {
    let temp_dir = fixture_dir("bob");
    let (success, _, _) = run_cli_in(temp_dir.path(), &[]);
    assert!(success);

    let (success, stdout, stderr) = run_cli_in(temp_dir.path(), &["verify", "root.layout", "--json"]);
    assert!(!success, "fixture key does not match the signer");
    assert!(stderr.contains("did not verify"));

    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["verified"], false);
    assert_eq!(parsed["signatures"][0]["verdict"], "unknown-key");
}

#[test]
fn test_verify_unsigned_layout_fails() {
    let temp_dir = TempDir::new().unwrap();
    let generated = fixture_dir("bob");
    run_cli_in(generated.path(), &[]);

    let mut value: Value =
        serde_json::from_slice(&fs::read(generated.path().join("root.layout")).unwrap()).unwrap();
    value["signatures"] = json!([]);
    fs::write(
        temp_dir.path().join("unsigned.layout"),
        serde_json::to_vec(&value).unwrap(),
    )
    .unwrap();

    let (success, stdout, stderr) = run_cli_in(temp_dir.path(), &["verify", "unsigned.layout"]);
    assert!(!success);
    assert!(stdout.contains("VERDICT"));
    assert!(stderr.contains("no signatures"));
}

#[test]
fn test_verify_rejects_non_layout() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("link.json"),
        r#"{"signatures": [], "signed": {"_type": "link"}}"#,
    )
    .unwrap();

    let (success, _, stderr) = run_cli_in(temp_dir.path(), &["verify", "link.json"]);
    assert!(!success);
    assert!(stderr.contains("Failed to load"));
}

#[test]
fn test_inspect_command() {
    let temp_dir = fixture_dir("bob");
    run_cli_in(temp_dir.path(), &[]);

    let (success, stdout, _) = run_cli_in(temp_dir.path(), &["inspect", "root.layout"]);
    assert!(success);
    assert!(stdout.contains("write-code"));
    assert!(stdout.contains("MATCH * WITH PRODUCTS FROM write-code"));
    assert!(stdout.contains("undeclared"));
    assert!(stdout.contains("2021-03-17T00:13:15Z (expired)"));
    assert!(stdout.contains("Digest:     sha256:"));

    let (success, stdout, _) = run_cli_in(temp_dir.path(), &["inspect", "root.layout", "--json"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["steps"][0]["name"], "write-code");
    assert_eq!(parsed["steps"][1]["name"], "package");
    assert_eq!(parsed["keys"][0]["keyid"], FIXTURE_KEY_ID);
    assert_eq!(parsed["keys"][0]["scheme"], "rsassa-pss-sha256");
    assert_eq!(parsed["expired"], true);
    let digest = parsed["signed_digest"].as_str().unwrap();
    assert!(digest.starts_with("sha256:"));
    assert_eq!(digest.len(), "sha256:".len() + 64);
}

#[test]
fn test_canonicalize_command() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("input.json"),
        "{ \"b\": 1, \"a\": \"line\\nbreak\" }",
    )
    .unwrap();

    let (success, stdout, _) = run_cli_in(temp_dir.path(), &["canonicalize", "input.json"]);
    assert!(success);
    assert_eq!(stdout, "{\"a\":\"line\nbreak\",\"b\":1}\n");
}

#[test]
fn test_canonicalize_rejects_floats() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("input.json"), r#"{"threshold": 1.5}"#).unwrap();

    let (success, _, stderr) = run_cli_in(temp_dir.path(), &["canonicalize", "input.json"]);
    assert!(!success);
    assert!(stderr.contains("Canonicalization failed"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let temp_dir = fixture_dir("bob");
    let (success, stdout, stderr) = run_cli_in(temp_dir.path(), &["-v"]);

    assert!(success);
    assert!(stderr.contains("signed layout written"));
    assert!(!stdout.contains("signed layout written"));
}
