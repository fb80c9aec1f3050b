use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn watch(store_dir: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_countdown"))
        .args(["--config-override", "tick_interval_ms=20", "watch"])
        .env("COUNTDOWN_STORE_DIR", store_dir)
        .env("COUNTDOWN_DISABLE_ALERTS", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start countdown watch");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("countdown watch did not exit")
}

fn stored(store_dir: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(store_dir.join("todos-countdown.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn watch_applies_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();

    let output = watch(
        dir.path(),
        "add \"Buy milk\"\nadd Walk dog\nlist active\nquit\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to show."));
    assert!(stdout.contains("Added todo: Buy milk"));
    assert!(stdout.contains("2 items left"));

    let todos = stored(dir.path());
    assert_eq!(todos[0]["title"], "Buy milk");
    assert_eq!(todos[1]["title"], "Walk dog");
}

#[test]
fn watch_reports_bad_lines_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();

    let output = watch(dir.path(), "toggle nope\nadd \"open\nadd ok\n");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found - todo not found"));
    assert!(stderr.contains("unterminated quote"));
    assert_eq!(stored(dir.path())[0]["title"], "ok");
}
