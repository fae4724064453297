//! Integration tests for env parsing and env-to-options merging.

use logport_config::{
    EnvParseError, LogFormat, LoggerEngine, LoggerEnv, LoggerOptions, apply_env_overrides,
};
use logport_ports::LogLevel;
use logport_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let path = workspace_root()
        .join("crates")
        .join("testkit")
        .join("fixtures")
        .join(relative);
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[test]
fn env_fixtures_merge_into_effective_options() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("env/logger-env.valid.json")?;
    let env = LoggerEnv::from_map(&env_map)?;

    let options = apply_env_overrides(LoggerOptions::default(), &env)?;

    assert_eq!(options.engine, LoggerEngine::Tracing);
    assert_eq!(options.console.level, LogLevel::Trace);
    assert_eq!(options.console.format, LogFormat::Json);
    assert!(options.file.enabled);
    assert_eq!(options.file.path, "/var/log/app");
    assert_eq!(options.file.name, "svc.log");
    assert_eq!(options.file.max_size_mb, 5);
    assert!(!options.file.compress);
    assert_eq!(options.file.max_age_days, 3);
    assert!(options.time.disabled);
    Ok(())
}

#[test]
fn invalid_env_fixture_fails_with_typed_error() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("env/logger-env.invalid.json")?;
    let error = LoggerEnv::from_map(&env_map)
        .err()
        .ok_or_else(|| std::io::Error::other("expected env parse error"))?;

    assert_eq!(
        error,
        EnvParseError::InvalidInt {
            var: "LOGPORT_FILE_MAX_SIZE_MB",
            value: "ten".to_string(),
        }
    );

    let envelope = ErrorEnvelope::from(error);
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_env_int"));
    assert_eq!(envelope.metadata.get("value").map(String::as_str), Some("ten"));
    Ok(())
}
