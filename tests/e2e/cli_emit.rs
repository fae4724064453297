//! CLI E2E tests for `logport emit`.

use std::io;
use std::process::Command;

fn logport() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_logport"));
    for (key, _) in std::env::vars() {
        if key.starts_with("LOGPORT_") {
            command.env_remove(key);
        }
    }
    command.env("LOGPORT_TIME_DISABLED", "true");
    command
}

#[test]
fn emit_writes_text_line_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args([
            "--no-progress",
            "emit",
            "--message",
            "foo method.",
            "--field",
            "main_field=example",
            "--field",
            "count=3",
        ])
        .output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "level=info msg=\"foo method.\" count=3 main_field=example\n"
    );
    Ok(())
}

#[test]
fn emit_below_threshold_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args(["--no-progress", "emit", "--level", "debug", "--message", "hidden"])
        .output()?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn emit_json_engine_carries_error_field() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args([
            "--no-progress",
            "emit",
            "--level",
            "error",
            "--message",
            "failed",
            "--error",
            "disk full",
        ])
        .env("LOGPORT_ENGINE", "json")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).map_err(io::Error::other)?;
    assert_eq!(
        value,
        serde_json::json!({"err": "disk full", "level": "error", "message": "failed"})
    );
    Ok(())
}

#[test]
fn emit_fatal_writes_then_exits_with_status_one() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args(["emit", "--level", "fatal", "--message", "giving up"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "level=fatal msg=\"giving up\"\n"
    );
    Ok(())
}

#[test]
fn emit_to_rolling_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let output = logport()
        .args(["--no-progress", "emit", "--message", "to file"])
        .env("LOGPORT_CONSOLE_ENABLED", "false")
        .env("LOGPORT_FILE_ENABLED", "true")
        .env("LOGPORT_FILE_PATH", dir.path())
        .env("LOGPORT_FILE_NAME", "cli.log")
        .output()?;
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(dir.path().join("cli.log"))?;
    assert_eq!(written, "level=info msg=\"to file\"\n");
    Ok(())
}

#[test]
fn emit_rejects_unknown_level() -> Result<(), Box<dyn std::error::Error>> {
    let output = logport()
        .args(["emit", "--level", "loud", "--message", "x"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: invalid input"));
    Ok(())
}
