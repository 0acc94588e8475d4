#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::tempdir;

fn planner(data_dir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("study-planner")?;
    cmd.arg("--data-dir").arg(data_dir).env_remove("RUST_LOG");
    Ok(cmd)
}

fn stdout_of(cmd: &mut Command) -> Result<String> {
    let output = cmd.output()?;
    assert!(output.status.success(), "command failed: {output:?}");
    Ok(String::from_utf8(output.stdout)?)
}

fn stored(data_dir: &Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(
        data_dir.join("study_planner_v1.json"),
    )?)?)
}

#[test]
fn first_run_writes_seeded_envelope() -> Result<()> {
    let dir = tempdir()?;
    let output = stdout_of(planner(dir.path())?.arg("stats"))?;
    assert!(output.contains("10 tasks • 3 completed"));

    let envelope = stored(dir.path())?;
    assert_eq!(envelope["version"], 2);
    assert_eq!(envelope["todos"].as_array().map(Vec::len), Some(10));
    Ok(())
}

#[test]
fn disabled_seed_starts_empty_and_add_persists() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.toml"), "[seed]\nenabled = false\n")?;

    let output = stdout_of(planner(dir.path())?.args([
        "add",
        "--title",
        "Simülasyon",
        "--type",
        "quiz",
        "--due",
        "2026-03-03",
    ]))?;
    assert!(output.starts_with("created task: "));

    let listed = stdout_of(planner(dir.path())?.args(["list", "--format", "json"]))?;
    let tasks: Value = serde_json::from_str(&listed)?;
    assert_eq!(tasks[0]["title"], "Simülasyon");
    assert_eq!(tasks[0]["type"], "quiz");
    assert_eq!(tasks[0]["dueDate"], "2026-03-03");
    Ok(())
}

#[test]
fn legacy_file_is_upgraded_on_open() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("study_planner_v1.json"),
        r#"[{"id":"a","title":"T"}]"#,
    )?;

    let output = stdout_of(planner(dir.path())?.arg("list"))?;
    assert!(output.contains("No due date"));
    assert!(output.contains("Showing 1 of 1"));

    let envelope = stored(dir.path())?;
    assert_eq!(envelope["version"], 2);
    assert_eq!(envelope["todos"][0]["type"], "other");
    assert_eq!(envelope["todos"][0]["isCompleted"], false);
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.toml"), "[undo]\nwindow_ms = 0\n")?;

    let output = planner(dir.path())?.arg("stats").output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("undo window_ms must be greater than zero"));
    Ok(())
}

#[test]
fn shell_reads_commands_from_stdin() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("config.toml"), "[seed]\nenabled = false\n")?;

    let output = stdout_of(
        planner(dir.path())?
            .arg("shell")
            .write_stdin("add --title 'Read chapter 3'\nlist --search chapter\nexit\n"),
    )?;
    assert!(output.contains("Read chapter 3"));
    assert!(output.contains("Showing 1 of 1"));
    Ok(())
}
