//! Environment variable parsing and env-to-options merging.
//!
//! Booleans, integers, engine and stream names are strict: invalid values
//! fail fast. Level and format names follow the schema and fall back to
//! `INFO` / `TEXT`.

use crate::schema::{ConsoleStream, LogFormat, LoggerEngine, LoggerOptions};
use logport_ports::LogLevel;
use logport_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: engine (`text`, `json`, `tracing`).
pub const ENV_ENGINE: &str = "LOGPORT_ENGINE";
/// Env var: error field name.
pub const ENV_ERROR_FIELD_NAME: &str = "LOGPORT_ERROR_FIELD_NAME";
/// Env var: install the built logger globally.
pub const ENV_INSTALL_GLOBAL: &str = "LOGPORT_INSTALL_GLOBAL";
/// Env var: disable timestamps.
pub const ENV_TIME_DISABLED: &str = "LOGPORT_TIME_DISABLED";
/// Env var: timestamp layout.
pub const ENV_TIME_FORMAT: &str = "LOGPORT_TIME_FORMAT";
/// Env var: console sink enabled.
pub const ENV_CONSOLE_ENABLED: &str = "LOGPORT_CONSOLE_ENABLED";
/// Env var: console level.
pub const ENV_CONSOLE_LEVEL: &str = "LOGPORT_CONSOLE_LEVEL";
/// Env var: console format.
pub const ENV_CONSOLE_FORMAT: &str = "LOGPORT_CONSOLE_FORMAT";
/// Env var: console stream.
pub const ENV_CONSOLE_STREAM: &str = "LOGPORT_CONSOLE_STREAM";
/// Env var: file sink enabled.
pub const ENV_FILE_ENABLED: &str = "LOGPORT_FILE_ENABLED";
/// Env var: file level.
pub const ENV_FILE_LEVEL: &str = "LOGPORT_FILE_LEVEL";
/// Env var: file format.
pub const ENV_FILE_FORMAT: &str = "LOGPORT_FILE_FORMAT";
/// Env var: file directory.
pub const ENV_FILE_PATH: &str = "LOGPORT_FILE_PATH";
/// Env var: file name.
pub const ENV_FILE_NAME: &str = "LOGPORT_FILE_NAME";
/// Env var: rotation size in megabytes.
pub const ENV_FILE_MAX_SIZE_MB: &str = "LOGPORT_FILE_MAX_SIZE_MB";
/// Env var: gzip rotated files.
pub const ENV_FILE_COMPRESS: &str = "LOGPORT_FILE_COMPRESS";
/// Env var: retention of rotated files in days.
pub const ENV_FILE_MAX_AGE_DAYS: &str = "LOGPORT_FILE_MAX_AGE_DAYS";

const ALL_ENV_VARS: [&str; 17] = [
    ENV_ENGINE,
    ENV_ERROR_FIELD_NAME,
    ENV_INSTALL_GLOBAL,
    ENV_TIME_DISABLED,
    ENV_TIME_FORMAT,
    ENV_CONSOLE_ENABLED,
    ENV_CONSOLE_LEVEL,
    ENV_CONSOLE_FORMAT,
    ENV_CONSOLE_STREAM,
    ENV_FILE_ENABLED,
    ENV_FILE_LEVEL,
    ENV_FILE_FORMAT,
    ENV_FILE_PATH,
    ENV_FILE_NAME,
    ENV_FILE_MAX_SIZE_MB,
    ENV_FILE_COMPRESS,
    ENV_FILE_MAX_AGE_DAYS,
];

/// Typed env-derived overrides for `LoggerOptions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggerEnv {
    /// Override for `engine`.
    pub engine: Option<LoggerEngine>,
    /// Override for `errorFieldName`.
    pub error_field_name: Option<String>,
    /// Override for `installGlobal`.
    pub install_global: Option<bool>,
    /// Override for `time.disabled`.
    pub time_disabled: Option<bool>,
    /// Override for `time.format`.
    pub time_format: Option<String>,
    /// Override for `console.enabled`.
    pub console_enabled: Option<bool>,
    /// Override for `console.level`.
    pub console_level: Option<LogLevel>,
    /// Override for `console.format`.
    pub console_format: Option<LogFormat>,
    /// Override for `console.stream`.
    pub console_stream: Option<ConsoleStream>,
    /// Override for `file.enabled`.
    pub file_enabled: Option<bool>,
    /// Override for `file.level`.
    pub file_level: Option<LogLevel>,
    /// Override for `file.format`.
    pub file_format: Option<LogFormat>,
    /// Override for `file.path`.
    pub file_path: Option<String>,
    /// Override for `file.name`.
    pub file_name: Option<String>,
    /// Override for `file.maxSizeMb`.
    pub file_max_size_mb: Option<u64>,
    /// Override for `file.compress`.
    pub file_compress: Option<bool>,
    /// Override for `file.maxAgeDays`.
    pub file_max_age_days: Option<u32>,
}

impl LoggerEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            engine: parse_optional_enum(map, ENV_ENGINE, LoggerEngine::parse)?,
            error_field_name: parse_optional_trimmed_string(map, ENV_ERROR_FIELD_NAME)?,
            install_global: parse_optional_bool(map, ENV_INSTALL_GLOBAL)?,
            time_disabled: parse_optional_bool(map, ENV_TIME_DISABLED)?,
            time_format: parse_optional_trimmed_string(map, ENV_TIME_FORMAT)?,
            console_enabled: parse_optional_bool(map, ENV_CONSOLE_ENABLED)?,
            console_level: parse_optional_level(map, ENV_CONSOLE_LEVEL)?,
            console_format: parse_optional_format(map, ENV_CONSOLE_FORMAT)?,
            console_stream: parse_optional_enum(map, ENV_CONSOLE_STREAM, ConsoleStream::parse)?,
            file_enabled: parse_optional_bool(map, ENV_FILE_ENABLED)?,
            file_level: parse_optional_level(map, ENV_FILE_LEVEL)?,
            file_format: parse_optional_format(map, ENV_FILE_FORMAT)?,
            file_path: parse_optional_trimmed_string(map, ENV_FILE_PATH)?,
            file_name: parse_optional_trimmed_string(map, ENV_FILE_NAME)?,
            file_max_size_mb: parse_optional_u64(map, ENV_FILE_MAX_SIZE_MB)?,
            file_compress: parse_optional_bool(map, ENV_FILE_COMPRESS)?,
            file_max_age_days: parse_optional_u32(map, ENV_FILE_MAX_AGE_DAYS)?,
        })
    }

    /// Parse env overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply env overrides to base options (env wins over file/default values).
pub fn apply_env_overrides(
    base: LoggerOptions,
    env: &LoggerEnv,
) -> Result<LoggerOptions, ErrorEnvelope> {
    let mut options = base;

    set_copy(&mut options.engine, env.engine);
    set_clone(&mut options.error_field_name, env.error_field_name.as_ref());
    set_copy(&mut options.install_global, env.install_global);

    set_copy(&mut options.time.disabled, env.time_disabled);
    set_clone(&mut options.time.format, env.time_format.as_ref());

    set_copy(&mut options.console.enabled, env.console_enabled);
    set_copy(&mut options.console.level, env.console_level);
    set_copy(&mut options.console.format, env.console_format);
    set_copy(&mut options.console.stream, env.console_stream);

    set_copy(&mut options.file.enabled, env.file_enabled);
    set_copy(&mut options.file.level, env.file_level);
    set_copy(&mut options.file.format, env.file_format);
    set_clone(&mut options.file.path, env.file_path.as_ref());
    set_clone(&mut options.file.name, env.file_name.as_ref());
    set_copy(&mut options.file.max_size_mb, env.file_max_size_mb);
    set_copy(&mut options.file.compress, env.file_compress);
    set_copy(&mut options.file.max_age_days, env.file_max_age_days);

    options.validate_and_normalize().map_err(Into::into)
}

fn set_copy<T: Copy>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn set_clone<T: Clone>(field: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidInt { var, .. } => write!(formatter, "{var} must be an integer"),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => {
                envelope = envelope.with_metadata("env_var", var);
            },
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidInt { var, value }
            | EnvParseError::InvalidEnum { var, value } => {
                envelope = envelope
                    .with_metadata("env_var", var)
                    .with_metadata("value", value);
            },
        }

        envelope
    }
}

fn present<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<String>, EnvParseError> {
    Ok(present(map, var)?.map(str::to_owned))
}

fn parse_optional_u64(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };

    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: trimmed.to_owned(),
        })
}

fn parse_optional_u32(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u32>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: trimmed.to_owned(),
        })
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_level(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<LogLevel>, EnvParseError> {
    Ok(present(map, var)?.map(LogLevel::from_name))
}

fn parse_optional_format(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<LogFormat>, EnvParseError> {
    Ok(present(map, var)?.map(LogFormat::from_name))
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };

    parse(trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_owned(),
        })
}
