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

fn write_store(path: &Path, tasks: serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(&tasks).unwrap()).unwrap();
}

fn read_store(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn task(title: &str, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "category": "Home",
        "priority": "medium",
        "due_date": "2025-01-10",
        "description": "",
        "created_at": created_at,
        "completed": false,
        "reminder": null
    })
}

#[test]
fn edit_command_updates_given_fields_only() {
    let store_path = temp_path("cli-edit.json");
    write_store(
        &store_path,
        serde_json::json!([task("old", "2024-12-01T00:00:00Z")]),
    );

    let output = taskmgr(&store_path)
        .args(["edit", "old", "--title", "new title", "--priority", "high"])
        .output()
        .expect("failed to run edit command");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Updated task: new title"));
    assert_eq!(stored[0]["title"], "new title");
    assert_eq!(stored[0]["priority"], "high");
    assert_eq!(stored[0]["category"], "Home");
    assert_eq!(stored[0]["due_date"], "2025-01-10");
}

#[test]
fn edit_command_without_changes_is_rejected() {
    let store_path = temp_path("cli-edit-noop.json");
    write_store(
        &store_path,
        serde_json::json!([task("old", "2024-12-01T00:00:00Z")]),
    );

    let output = taskmgr(&store_path)
        .args(["edit", "old"])
        .output()
        .expect("failed to run edit command");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - nothing to change"));
}

#[test]
fn edit_command_reports_missing_title() {
    let store_path = temp_path("cli-edit-missing.json");
    write_store(&store_path, serde_json::json!([]));

    let output = taskmgr(&store_path)
        .args(["edit", "ghost", "--title", "new title"])
        .output()
        .expect("failed to run edit command");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found - task not found: ghost"));
}

#[test]
fn remove_command_removes_first_match_only() {
    let store_path = temp_path("cli-remove.json");
    write_store(
        &store_path,
        serde_json::json!([
            task("dup", "2024-12-01T00:00:00Z"),
            task("keep", "2024-12-02T00:00:00Z"),
            task("dup", "2024-12-03T00:00:00Z"),
        ]),
    );

    let output = taskmgr(&store_path)
        .args(["remove", "dup"])
        .output()
        .expect("failed to run remove command");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Removed task: dup"));
    let tasks = stored.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "keep");
    assert_eq!(tasks[1]["created_at"], "2024-12-03T00:00:00Z");
}

#[test]
fn remove_command_reports_missing_title_and_keeps_store() {
    let store_path = temp_path("cli-remove-missing.json");
    write_store(
        &store_path,
        serde_json::json!([task("keep", "2024-12-01T00:00:00Z")]),
    );

    let output = taskmgr(&store_path)
        .args(["remove", "ghost"])
        .output()
        .expect("failed to run remove command");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
    assert_eq!(stored.as_array().unwrap().len(), 1);
}
