//! End-to-end tests for the `simrec` binary.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin still works, just deprecated for custom build-dir

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a simrec command isolated from the caller's environment.
fn simrec() -> Command {
    let mut cmd = Command::cargo_bin("simrec").expect("Failed to find simrec binary");
    cmd.env_remove("SIMREC_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Write `contents` to a temporary file.
fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{contents}").expect("Failed to write temp file");
    file
}

/// Rows 0 and 2 are identical, row 1 is orthogonal to both.
fn counts_matrix() -> NamedTempFile {
    temp_file(r#"{"layout": "dense", "kind": "int64", "rows": [[1, 0, 1], [0, 1, 0], [1, 0, 1]]}"#)
}

fn sparse_counts_matrix() -> NamedTempFile {
    temp_file(
        r#"{"layout": "sparse", "kind": "int32", "shape": [3, 3],
            "entries": [[0, 0, 1], [0, 2, 1], [1, 1, 1], [2, 0, 1], [2, 2, 1]]}"#,
    )
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_flag() {
    simrec()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("top-k"))
        .stdout(predicate::str::contains("all-pairs"));
}

#[test]
fn test_version_flag() {
    simrec().arg("--version").assert().success().stdout(predicate::str::contains("simrec"));
}

// ============================================================================
// Inspect
// ============================================================================

#[test]
fn test_inspect_reports_footprint() {
    let matrix = counts_matrix();
    simrec()
        .args(["inspect", matrix.path().to_str().unwrap(), "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Layout,dense"))
        .stdout(predicate::str::contains("Kind,int64"))
        .stdout(predicate::str::contains("Value bytes,72"))
        .stdout(predicate::str::contains("Narrowed kind,int16"))
        .stdout(predicate::str::contains("Narrowed bytes,18"));
}

// ============================================================================
// Similar and All-Pairs
// ============================================================================

#[test]
fn test_similar_scores_every_row() {
    let matrix = counts_matrix();
    simrec()
        .args(["similar", matrix.path().to_str().unwrap(), "--row", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0000"))
        .stdout(predicate::str::contains("(3 rows)"));
}

#[test]
fn test_similar_row_out_of_range() {
    let matrix = counts_matrix();
    simrec()
        .args(["similar", matrix.path().to_str().unwrap(), "--row", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("index out of bounds"));
}

#[test]
fn test_all_pairs_json() {
    let matrix = sparse_counts_matrix();
    let output = simrec()
        .args(["all-pairs", matrix.path().to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["rows"], 3);
    assert_eq!(json["cols"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 9);
}

#[test]
fn test_unsigned_requires_no_cast() {
    let matrix = temp_file(r#"{"layout": "dense", "kind": "uint8", "rows": [[1, 2], [3, 4]]}"#);
    let path = matrix.path().to_str().unwrap();

    simrec()
        .args(["all-pairs", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("uint8 not supported"));

    simrec().args(["all-pairs", path, "--no-cast"]).assert().success();
}

// ============================================================================
// Top-K
// ============================================================================

#[test]
fn test_top_k_csv() {
    let matrix = counts_matrix();
    simrec()
        .args(["top-k", matrix.path().to_str().unwrap(), "-k", "2", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("row,0,1\n0,0,2\n1,1,0\n2,0,2\n"));
}

#[test]
fn test_top_k_sparse_matches_dense() {
    let matrix = sparse_counts_matrix();
    simrec()
        .args(["top-k", matrix.path().to_str().unwrap(), "-k", "2", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("row,0,1\n0,0,2\n1,1,0\n2,0,2\n"));
}

#[test]
fn test_top_k_exclude_self() {
    let matrix = counts_matrix();
    simrec()
        .args(["top-k", matrix.path().to_str().unwrap(), "-k", "1", "--exclude-self", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("row,0\n0,2\n1,0\n2,0\n"));
}

#[test]
fn test_top_k_rejects_large_k() {
    let matrix = counts_matrix();
    simrec()
        .args(["top-k", matrix.path().to_str().unwrap(), "-k", "3", "--exclude-self"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid k: 3"));
}

#[test]
fn test_top_k_reject_zero_norm() {
    let matrix =
        temp_file(r#"{"layout": "dense", "kind": "float32", "rows": [[1, 2], [0, 0], [2, 1]]}"#);
    simrec()
        .args(["top-k", matrix.path().to_str().unwrap(), "-k", "2", "--reject-zero-norm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 1 has zero norm"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_supplies_defaults() {
    let matrix = counts_matrix();
    let config = temp_file("format = \"json\"\n\n[top_k]\nk = 1\n");

    simrec()
        .args(["top-k", matrix.path().to_str().unwrap()])
        .args(["--config", config.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"k\": 1"));
}

#[test]
fn test_flags_override_config_file() {
    let matrix = counts_matrix();
    let config = temp_file("format = \"json\"\n\n[top_k]\nk = 1\n");

    simrec()
        .args(["top-k", matrix.path().to_str().unwrap(), "-k", "2", "--format", "csv"])
        .env("SIMREC_CONFIG", config.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("row,0,1\n"));
}

#[test]
fn test_unknown_config_key_fails() {
    let matrix = counts_matrix();
    let config = temp_file("colour = \"blue\"\n");

    simrec()
        .args(["inspect", matrix.path().to_str().unwrap()])
        .args(["--config", config.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn test_unknown_top_k_key_fails() {
    let matrix = counts_matrix();
    let config = temp_file("[top_k]\nself_mach = \"exclude\"\n");

    simrec()
        .args(["top-k", matrix.path().to_str().unwrap()])
        .args(["--config", config.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_missing_matrix_file() {
    simrec()
        .args(["inspect", "/nonexistent/matrix.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_malformed_document() {
    let matrix = temp_file(r#"{"layout": "dense", "rows": [[1]]}"#);
    simrec()
        .args(["inspect", matrix.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));
}
