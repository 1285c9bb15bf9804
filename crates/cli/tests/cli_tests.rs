// Integration tests for the `gridsync` binary.
// Run with: cargo test -p gridsync-cli --test cli_tests -- --nocapture
//
// Manual smoke test (cannot be automated, requires a real TTY):
//   gridsync grid --dry-run
//   Verify: drag selects, click edits, Enter moves down, q exits, terminal restored.

use std::path::Path;
use std::process::Command;

fn gridsync(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gridsync"));
    cmd.env("GRIDSYNC_CONFIG", config_dir.join("settings.json"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("script.jsonl");
    std::fs::write(&path, body).unwrap();
    path
}

// ---------------------------------------------------------------------------
// replay --dry-run prints a summary and the recorded requests
// ---------------------------------------------------------------------------

#[test]
fn replay_dry_run_reports_requests() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        r#"{"type":"pointer_down","row":0,"col":0}
{"type":"pointer_up","row":1,"col":1}
{"type":"key","key":"m","ctrl":true}
"#,
    );

    let output = gridsync(dir.path())
        .args(["replay", script.to_str().unwrap(), "--dry-run"])
        .output()
        .expect("gridsync replay");

    assert!(output.status.success(), "exit code: {:?}\nstderr: {}",
        output.status, String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["events"], 3);
    assert_eq!(json["summary"]["selected_cells"], 4);
    assert_eq!(json["summary"]["selection"]["end_col"], 1);

    let requests = json["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 2);
    // The committed selection reaches the backend before the chord acts on it.
    assert_eq!(requests[0]["type"], "sync_selection");
    assert_eq!(requests[0]["rect"]["end_row"], 1);
    assert_eq!(requests[1]["type"], "bulk_edit");
    assert_eq!(requests[1]["command"], "Move Forward");
}

// ---------------------------------------------------------------------------
// --rows/--cols override the settings file
// ---------------------------------------------------------------------------

#[test]
fn replay_grid_size_override() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        r#"{"type":"pointer_down","row":-1,"col":0}
{"type":"pointer_up","row":-1,"col":0}
"#,
    );

    let output = gridsync(dir.path())
        .args(["replay", script.to_str().unwrap(), "--dry-run", "--rows", "3", "--cols", "2"])
        .output()
        .expect("gridsync replay");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["selected_cells"], 3);
}

// ---------------------------------------------------------------------------
// Bad input exits with the usage code
// ---------------------------------------------------------------------------

#[test]
fn replay_bad_script_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "{\"type\":\"teleport\"}\n");

    let output = gridsync(dir.path())
        .args(["replay", script.to_str().unwrap(), "--dry-run"])
        .output()
        .expect("gridsync replay");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 1"), "stderr: {}", stderr);
}

#[test]
fn replay_missing_script_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = gridsync(dir.path())
        .args(["replay", "does-not-exist.jsonl", "--dry-run"])
        .output()
        .expect("gridsync replay");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn replay_bad_endpoint_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "");
    let output = gridsync(dir.path())
        .args(["replay", script.to_str().unwrap(), "--endpoint", "not a url"])
        .output()
        .expect("gridsync replay");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("hint:"));
}

// ---------------------------------------------------------------------------
// config --init writes a default file once
// ---------------------------------------------------------------------------

#[test]
fn config_init_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let output = gridsync(dir.path())
        .args(["config", "--init"])
        .output()
        .expect("gridsync config");
    assert!(output.status.success());
    assert!(dir.path().join("settings.json").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"sync.selectionIntervalMs\": 25"), "stdout: {}", stdout);

    let again = gridsync(dir.path())
        .args(["config", "--init"])
        .output()
        .expect("gridsync config");
    assert!(again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));
}
