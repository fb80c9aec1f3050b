use std::path::Path;
use std::process::{Command, Output};

fn countdown(store_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_countdown"))
        .args(args)
        .env("COUNTDOWN_STORE_DIR", store_dir)
        .env("COUNTDOWN_DISABLE_ALERTS", "1")
        .output()
        .expect("failed to run countdown")
}

fn stored(store_dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(store_dir.join("todos-countdown.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn add_persists_a_trimmed_active_todo() {
    let dir = tempfile::tempdir().unwrap();

    let output = countdown(dir.path(), &["add", "  Buy", "milk  "]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Added todo: Buy milk ("));

    let todos = stored(dir.path());
    assert_eq!(todos.as_array().unwrap().len(), 1);
    assert_eq!(todos[0]["title"], "Buy milk");
    assert_eq!(todos[0]["completed"], false);
    assert!(todos[0].get("deadline").is_none());
    assert_eq!(todos[0]["id"].as_str().unwrap().len(), 36);
}

#[test]
fn add_rejects_blank_title() {
    let dir = tempfile::tempdir().unwrap();

    let output = countdown(dir.path(), &["add", "   "]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - title is required"));
    assert!(!dir.path().join("todos-countdown.json").exists());
}

#[test]
fn json_add_then_toggle_and_list_by_filter() {
    let dir = tempfile::tempdir().unwrap();

    let output = countdown(dir.path(), &["--json", "add", "Buy", "milk"]);
    let added: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = added["id"].as_str().unwrap().to_string();
    countdown(dir.path(), &["add", "Walk", "dog"]);

    let output = countdown(dir.path(), &["toggle", &id[..8]]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Completed todo: Buy milk"));

    let output = countdown(dir.path(), &["--json", "list", "completed"]);
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed["filter"], "completed");
    assert_eq!(listed["active_count"], 1);
    assert_eq!(listed["completed_count"], 1);
    assert_eq!(listed["todos"].as_array().unwrap().len(), 1);
    assert_eq!(listed["todos"][0]["title"], "Buy milk");

    let output = countdown(dir.path(), &["--json", "list", "#/active"]);
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed["todos"][0]["title"], "Walk dog");
}

#[test]
fn plain_list_shows_table_and_footer() {
    let dir = tempfile::tempdir().unwrap();
    countdown(dir.path(), &["add", "Buy", "milk"]);
    countdown(dir.path(), &["add", "Walk", "dog"]);

    let output = countdown(dir.path(), &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Buy milk"));
    assert!(stdout.contains("Walk dog"));
    assert!(stdout.contains("2 items left"));
}

#[test]
fn toggle_all_and_clear_completed() {
    let dir = tempfile::tempdir().unwrap();
    countdown(dir.path(), &["add", "one"]);
    countdown(dir.path(), &["add", "two"]);

    let output = countdown(dir.path(), &["toggle-all"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Marked 2 todos completed"
    );

    let output = countdown(dir.path(), &["clear-completed"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Cleared 2 completed todos"
    );
    assert_eq!(stored(dir.path()), serde_json::json!([]));
}

#[test]
fn namespace_override_uses_separate_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = countdown(
        dir.path(),
        &["--config-override", "namespace=work", "add", "Ship"],
    );
    assert!(output.status.success());
    assert!(dir.path().join("work.json").exists());
    assert!(!dir.path().join("todos-countdown.json").exists());
}

#[test]
fn corrupt_store_loads_as_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("todos-countdown.json"), "{not json").unwrap();

    let output = countdown(dir.path(), &["--json", "list"]);
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed["total_count"], 0);
}
