use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskmgr-{nanos}-{file_name}"))
}

fn taskmgr(store_path: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_taskmgr"));
    command
        .env("TASKMGR_STORE_PATH", store_path)
        .env("TASKMGR_CONFIG_PATH", store_path.with_extension("config.json"));
    command
}

#[test]
fn add_command_persists_task() {
    let store_path = temp_path("cli-add.json");
    let output = taskmgr(&store_path)
        .args([
            "add",
            "Buy milk",
            "--due",
            "2025-01-01",
            "--category",
            "Errands",
            "--priority",
            "low",
        ])
        .output()
        .expect("failed to run add command");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk (due 2025-01-01)"));

    let tasks = stored.as_array().expect("task array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["category"], "Errands");
    assert_eq!(tasks[0]["priority"], "low");
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0]["reminder"].is_null());
    assert!(tasks[0]["created_at"].is_string());
}

#[test]
fn add_command_json_prints_task() {
    let store_path = temp_path("cli-add-json.json");
    let output = taskmgr(&store_path)
        .args(["--json", "add", "Read book", "--due", "2025-02-01"])
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["title"], "Read book");
    assert_eq!(parsed["due_date"], "2025-02-01");
}

#[test]
fn add_command_rejects_missing_title() {
    let store_path = temp_path("cli-add-missing.json");
    let output = taskmgr(&store_path)
        .args(["add", "--due", "2025-01-01"])
        .output()
        .expect("failed to run add command");

    assert!(!store_path.exists());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - title is required"));
}

#[test]
fn add_command_rejects_malformed_due_date() {
    let store_path = temp_path("cli-add-bad-date.json");
    let output = taskmgr(&store_path)
        .args(["add", "demo", "--due", "next week"])
        .output()
        .expect("failed to run add command");

    assert!(!store_path.exists());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - due date must be YYYY-MM-DD"));
}

#[test]
fn add_command_requires_due_date_flag() {
    let store_path = temp_path("cli-add-no-due.json");
    let output = taskmgr(&store_path)
        .args(["add", "demo"])
        .output()
        .expect("failed to run add command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn add_command_rejects_blank_title() {
    let store_path = temp_path("cli-add-blank.json");
    let output = taskmgr(&store_path)
        .args(["add", "   ", "--due", "2025-01-01"])
        .output()
        .expect("failed to run add command");

    assert!(!store_path.exists());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - title is required"));
}
