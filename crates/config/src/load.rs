//! Options loading helpers (env + file + overrides).
//!
//! The loader is responsible for deterministic merge order and surfacing
//! user-facing errors as typed `ErrorEnvelope`s.

use crate::{
    ConsoleStream, LogFormat, LoggerEngine, LoggerEnv, LoggerOptions, apply_env_overrides,
};
use logport_ports::LogLevel;
use logport_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

/// Load logger options from sources using a deterministic precedence order.
///
/// Precedence (highest wins):
/// - env overrides (`LoggerEnv`)
/// - overrides JSON (partial options)
/// - config JSON (file content)
/// - defaults (`LoggerOptions::default()`)
pub fn load_logger_options_from_sources(
    config_json: Option<&str>,
    overrides_json: Option<&str>,
    env: &LoggerEnv,
) -> Result<LoggerOptions, ErrorEnvelope> {
    let mut options = match config_json {
        None => LoggerOptions::default(),
        Some(input) => parse_options_unvalidated(input, ConfigFormat::Json)?,
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut options, overrides);
    }

    // env is applied last and also validates/normalizes the result.
    apply_env_overrides(options, env)
}

/// Load logger options from an optional file path (`.json` or `.toml`).
pub fn load_logger_options_from_path(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
    env: &LoggerEnv,
) -> Result<LoggerOptions, ErrorEnvelope> {
    let mut options = match config_path {
        None => LoggerOptions::default(),
        Some(path) => {
            let format = detect_config_format(path)?;
            let config_text = read_config_file(path)?;
            parse_options_unvalidated(&config_text, format)?
        },
    };

    if let Some(input) = overrides_json {
        let overrides = parse_overrides_json(input)?;
        apply_overrides(&mut options, overrides);
    }

    // env is applied last and also validates/normalizes the result.
    apply_env_overrides(options, env)
}

/// Load logger options from std env and an optional file path.
pub fn load_logger_options_std_env(
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<LoggerOptions, ErrorEnvelope> {
    let env = LoggerEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    load_logger_options_from_path(config_path, overrides_json, &env)
}

/// Serialize the options as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(options: &LoggerOptions) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(options).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize options: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the options as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(options: &LoggerOptions) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(options).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize options TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

fn parse_options_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<LoggerOptions, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
            .with_metadata("source", "config")
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
            .with_metadata("source", "config")
        }),
    }
}

fn parse_overrides_json(input: &str) -> Result<LoggerOptionsOverrides, ErrorEnvelope> {
    serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid overrides JSON: {error}"),
        )
        .with_metadata("source", "overrides")
    })
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn detect_config_format(path: &Path) -> Result<ConfigFormat, ErrorEnvelope> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        None | Some("json") => Ok(ConfigFormat::Json),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some(other) => Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "unsupported_format"),
            "unsupported config format; use .json or .toml",
        )
        .with_metadata("extension", other.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct LoggerOptionsOverrides {
    engine: Option<LoggerEngine>,
    error_field_name: Option<String>,
    install_global: Option<bool>,
    time: TimeOverrides,
    console: ConsoleOverrides,
    file: FileOverrides,
    cloudwatch: CloudWatchOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct TimeOverrides {
    disabled: Option<bool>,
    format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct ConsoleOverrides {
    enabled: Option<bool>,
    level: Option<LogLevel>,
    format: Option<LogFormat>,
    stream: Option<ConsoleStream>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct FileOverrides {
    enabled: Option<bool>,
    level: Option<LogLevel>,
    format: Option<LogFormat>,
    path: Option<String>,
    name: Option<String>,
    max_size_mb: Option<u64>,
    compress: Option<bool>,
    max_age_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
struct CloudWatchOverrides {
    prefix_fields: Option<Vec<String>>,
    quote_empty_fields: Option<bool>,
}

fn apply_overrides(options: &mut LoggerOptions, overrides: LoggerOptionsOverrides) {
    set(&mut options.engine, overrides.engine);
    set(&mut options.error_field_name, overrides.error_field_name);
    set(&mut options.install_global, overrides.install_global);

    set(&mut options.time.disabled, overrides.time.disabled);
    set(&mut options.time.format, overrides.time.format);

    set(&mut options.console.enabled, overrides.console.enabled);
    set(&mut options.console.level, overrides.console.level);
    set(&mut options.console.format, overrides.console.format);
    set(&mut options.console.stream, overrides.console.stream);

    set(&mut options.file.enabled, overrides.file.enabled);
    set(&mut options.file.level, overrides.file.level);
    set(&mut options.file.format, overrides.file.format);
    set(&mut options.file.path, overrides.file.path);
    set(&mut options.file.name, overrides.file.name);
    set(&mut options.file.max_size_mb, overrides.file.max_size_mb);
    set(&mut options.file.compress, overrides.file.compress);
    set(&mut options.file.max_age_days, overrides.file.max_age_days);

    set(
        &mut options.cloudwatch.prefix_fields,
        overrides.cloudwatch.prefix_fields,
    );
    set(
        &mut options.cloudwatch.quote_empty_fields,
        overrides.cloudwatch.quote_empty_fields,
    );
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ENV_CONSOLE_LEVEL, ENV_FILE_MAX_SIZE_MB};
    use std::collections::BTreeMap;

    #[test]
    fn override_precedence_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let config = r#"{"console":{"level":"WARN","format":"JSON"},"file":{"maxSizeMb":50}}"#;
        let overrides = r#"{"console":{"level":"ERROR"},"file":{"maxSizeMb":20}}"#;
        let mut env_map = BTreeMap::new();
        env_map.insert(ENV_CONSOLE_LEVEL.to_string(), "DEBUG".to_string());
        let env = LoggerEnv::from_map(&env_map)?;

        let options = load_logger_options_from_sources(Some(config), Some(overrides), &env)?;

        assert_eq!(options.console.level, LogLevel::Debug);
        assert_eq!(options.console.format, LogFormat::Json);
        assert_eq!(options.file.max_size_mb, 20);
        Ok(())
    }

    #[test]
    fn serialization_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let options = LoggerOptions::default();
        let first = to_pretty_json(&options)?;
        let second = to_pretty_json(&options)?;
        assert_eq!(first, second);
        assert!(first.ends_with('\n'));

        let toml_text = to_pretty_toml(&options)?;
        assert!(toml_text.contains("[console]"));
        Ok(())
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let options = load_logger_options_from_sources(None, None, &LoggerEnv::default())?;
        assert_eq!(options, LoggerOptions::default());
        Ok(())
    }

    #[test]
    fn invalid_config_value_overridden_by_valid_env_succeeds()
    -> Result<(), Box<dyn std::error::Error>> {
        let config = r#"{"file":{"enabled":true,"maxSizeMb":0}}"#;
        let mut env_map = BTreeMap::new();
        env_map.insert(ENV_FILE_MAX_SIZE_MB.to_string(), "7".to_string());
        let env = LoggerEnv::from_map(&env_map)?;

        let options = load_logger_options_from_sources(Some(config), None, &env)?;
        assert_eq!(options.file.max_size_mb, 7);
        Ok(())
    }

    #[test]
    fn invalid_overrides_fail() -> Result<(), Box<dyn std::error::Error>> {
        let result =
            load_logger_options_from_sources(None, Some(r#"{"nope":1}"#), &LoggerEnv::default());
        let error = result
            .err()
            .ok_or_else(|| std::io::Error::other("expected overrides error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "invalid_json"));
        assert_eq!(
            error.metadata.get("source").map(String::as_str),
            Some("overrides")
        );
        Ok(())
    }

    #[test]
    fn unsupported_extension_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let result = load_logger_options_from_path(
            Some(Path::new("logger.yaml")),
            None,
            &LoggerEnv::default(),
        );
        let error = result
            .err()
            .ok_or_else(|| std::io::Error::other("expected format error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "unsupported_format"));
        Ok(())
    }

    #[test]
    fn missing_file_reports_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let result = load_logger_options_from_path(
            Some(Path::new("/definitely/not/here/logger.toml")),
            None,
            &LoggerEnv::default(),
        );
        let error = result
            .err()
            .ok_or_else(|| std::io::Error::other("expected missing file error"))?;
        assert_eq!(error.code, ErrorCode::new("config", "config_file_not_found"));
        Ok(())
    }
}
