//! CLI E2E tests for `logport config`.

use logport_testkit::fixture_path;
use std::io;
use std::process::Command;

fn logport() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_logport"));
    for (key, _) in std::env::vars() {
        if key.starts_with("LOGPORT_") {
            command.env_remove(key);
        }
    }
    command
}

#[test]
fn config_show_json_reports_effective_options() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args(["--json", "--no-progress", "config", "show"])
        .env("LOGPORT_CONSOLE_FORMAT", "json")
        .env("LOGPORT_FILE_MAX_AGE_DAYS", "7")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["configPath"], serde_json::Value::Null);
    assert_eq!(value["effectiveConfig"]["console"]["format"], "JSON");
    assert_eq!(value["effectiveConfig"]["file"]["maxAgeDays"], 7);
    assert!(output.stderr.is_empty());
    Ok(())
}

#[test]
fn config_check_accepts_fixture_file() -> Result<(), Box<dyn std::error::Error>> {
    let valid = fixture_path("config/logger-options.valid.json");
    let output = logport()
        .args(["--json", "config", "check", "--path"])
        .arg(&valid)
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "ok");
    assert!(String::from_utf8_lossy(&output.stderr).contains("info: config check completed"));
    Ok(())
}

#[test]
fn config_check_rejects_invalid_file() -> Result<(), Box<dyn std::error::Error>> {
    let invalid = fixture_path("config/logger-options.invalid.json");
    let output = logport()
        .args(["--json", "config", "check", "--path"])
        .arg(&invalid)
        .output()?;
    assert_eq!(output.status.code(), Some(2));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(value["status"], "error");
    assert!(value["error"]["code"].is_string());
    Ok(())
}

#[test]
fn config_show_rejects_unparseable_env() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args(["config", "show"])
        .env("LOGPORT_FILE_ENABLED", "maybe")
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("status: error\n"));
    Ok(())
}
