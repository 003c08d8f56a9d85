//! Integration tests for the tiny CLI
//!
//! These tests invoke the actual `tiny` binary and verify:
//! - Exit codes (0 = clean, 1 = diagnostics, 2 = unreadable input)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn tiny_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tiny"))
}

fn fixture_valid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/valid/{}", name))
}

fn fixture_invalid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/invalid/{}", name))
}

fn run_tiny(args: &[&str]) -> std::process::Output {
    Command::new(tiny_bin())
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("TINY_LOG")
        .output()
        .expect("failed to execute tiny")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("should be valid JSON")
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_tiny(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tiny"), "should contain 'tiny'");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "should contain version");
    assert!(
        stdout.contains(&format!("tiny-core {}", tiny_core::VERSION)),
        "should report the core library version"
    );
}

#[test]
fn test_version_flag() {
    let output = run_tiny(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "should contain version");
}

// ── Check ─────────────────────────────────────────────────

#[test]
fn test_check_valid_file() {
    let output = run_tiny(&["check", fixture_valid("minimal.tiny").to_str().unwrap()]);
    assert!(output.status.success(), "valid file should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valid"), "should mention valid");
}

#[test]
fn test_check_invalid_body() {
    let output = run_tiny(&["check", fixture_invalid("broken-body.tiny").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1), "defective file should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "should mention error");
    assert!(stderr.contains("invalid identifier"), "should report the misplaced field");
    assert!(stderr.contains(":3 "), "should point at line 3");
}

#[test]
fn test_check_bad_header() {
    let output = run_tiny(&["check", fixture_invalid("bad-header.tiny").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid header"));
    assert!(stderr.contains("1 error(s)"));
}

#[test]
fn test_check_nonexistent_file() {
    let output = run_tiny(&["check", "nonexistent.tiny"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
}

#[test]
fn test_check_json_output() {
    let output = run_tiny(&["check", "--json", fixture_valid("full.tiny").to_str().unwrap()]);
    assert!(output.status.success(), "valid file --json should exit 0");
    let json = stdout_json(&output);
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], 0);
    assert_eq!(json["summary"]["classes"], 2);
    assert_eq!(json["summary"]["methods"], 2);
    assert_eq!(json["summary"]["parameters"], 2);
    assert_eq!(json["summary"]["local_vars"], 1);
}

#[test]
fn test_check_json_invalid() {
    let output = run_tiny(&["check", "--json", fixture_invalid("broken-body.tiny").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"], 4);
    assert_eq!(json["diagnostics"][0]["line"], 3);
    assert_eq!(json["diagnostics"][0]["kind"], "identifier");
    assert_eq!(json["summary"]["classes"], 1);
}

#[test]
fn test_check_json_bad_header_has_no_summary() {
    let output = run_tiny(&["check", "--json", fixture_invalid("bad-header.tiny").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["errors"], 1);
    assert_eq!(json["diagnostics"][0]["kind"], "header");
    assert!(json["summary"].is_null());
}

// ── Dump ──────────────────────────────────────────────────

#[test]
fn test_dump_tree() {
    let output = run_tiny(&["dump", fixture_valid("full.tiny").to_str().unwrap()]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["metadata"]["namespaces"][2], "named");
    assert_eq!(json["metadata"]["properties"]["escaped-names"], "1");
    assert_eq!(json["classes"][0]["names"][2], "net/minecraft/Block");
    assert_eq!(json["classes"][0]["fields"][0]["comments"][0], "How hard the block is");
    assert_eq!(json["classes"][0]["methods"][0]["parameters"][0]["comments"][0], "The x coordinate");
}

#[test]
fn test_dump_soft_errors_still_print_tree() {
    let output = run_tiny(&["dump", fixture_invalid("broken-body.tiny").to_str().unwrap()]);
    assert!(output.status.success(), "soft diagnostics do not fail dump");
    let json = stdout_json(&output);
    assert_eq!(json["classes"][0]["names"][1], "Foo");
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn test_dump_bad_header() {
    let output = run_tiny(&["dump", fixture_invalid("bad-header.tiny").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

// ── Hash ──────────────────────────────────────────────────

#[test]
fn test_hash_is_stable() {
    let path = fixture_valid("full.tiny");
    let first = run_tiny(&["hash", path.to_str().unwrap()]);
    let second = run_tiny(&["hash", path.to_str().unwrap()]);
    assert!(first.status.success());
    let hash = String::from_utf8_lossy(&first.stdout).trim().to_string();
    assert_eq!(hash.len(), 64);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_hash_differs_between_files() {
    let a = run_tiny(&["hash", fixture_valid("full.tiny").to_str().unwrap()]);
    let b = run_tiny(&["hash", fixture_valid("minimal.tiny").to_str().unwrap()]);
    assert_ne!(a.stdout, b.stdout);
}

#[test]
fn test_hash_bad_header() {
    let output = run_tiny(&["hash", fixture_invalid("bad-header.tiny").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

// ── Logging ───────────────────────────────────────────────

#[test]
fn test_verbose_logs_to_stderr_only() {
    let output = run_tiny(&["-vv", "check", "--json", fixture_valid("minimal.tiny").to_str().unwrap()]);
    assert!(output.status.success());
    // stdout stays machine-readable
    let json = stdout_json(&output);
    assert_eq!(json["valid"], true);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("header parsed"), "debug events expected on stderr");
}
