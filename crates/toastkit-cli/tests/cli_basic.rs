//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory.

use std::path::Path;
use std::process::Command;

use indoc::indoc;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(config_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_toastkit"))
        .args(args)
        .env("TOASTKIT_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "queue.capacity"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1");
    assert!(dir.path().join("toast.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timing.remove_delay_ms", "250"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timing.remove_delay_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "250");
}

#[test]
fn test_config_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "queue.capacity", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("queue.capacity"));

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "queue.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["timing"]["default_duration_ms"], 5000);
}

#[test]
fn test_simulate_prints_frames() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("evict.toml");
    std::fs::write(
        &script,
        indoc! {r#"
            [[steps]]
            type = "toast"
            label = "a"
            title = "A"
            duration = { millis = 100 }

            [[steps]]
            type = "toast"
            label = "b"
            title = "B"
            duration = "never"

            [[steps]]
            type = "advance"
            ms = 2000

            [[steps]]
            type = "dismiss"
            label = "b"

            [[steps]]
            type = "advance"
            ms = 1000
        "#},
    )
    .unwrap();

    let (code, stdout, stderr) = run_cli(dir.path(), &["simulate", script.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {stderr}");

    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    // add A, add B (evicts A), dismiss B, remove B
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[1]["toasts"].as_array().unwrap().len(), 1);
    assert_eq!(frames[1]["toasts"][0]["title"], "B");
    assert_eq!(frames[2]["at_ms"], 2000);
    assert_eq!(frames[2]["toasts"][0]["open"], false);
    assert_eq!(frames[3]["at_ms"], 3000);
    assert!(frames[3]["toasts"].as_array().unwrap().is_empty());
}

#[test]
fn test_simulate_rejects_unknown_step() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("bad.toml");
    std::fs::write(&script, "[[steps]]\ntype = \"explode\"\n").unwrap();

    let (code, _, stderr) = run_cli(dir.path(), &["simulate", script.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error"));
}

#[test]
fn test_bundled_scenarios_run() {
    let dir = tempfile::tempdir().unwrap();
    let scenarios = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["single_slot.toml", "dismiss_all.toml"] {
        let script = scenarios.join(name);
        let (code, stdout, stderr) = run_cli(dir.path(), &["simulate", script.to_str().unwrap()]);
        assert_eq!(code, 0, "{name}: {stderr}");

        let last: serde_json::Value = serde_json::from_str(stdout.lines().last().unwrap()).unwrap();
        assert!(
            last["toasts"].as_array().unwrap().is_empty(),
            "{name} should end with an empty queue"
        );
    }
}
