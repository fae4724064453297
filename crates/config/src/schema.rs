//! Logger options schema, defaults, builder setters and validation.
//!
//! - Deserialization uses `serde` (JSON or TOML), `camelCase`, unknown
//!   fields rejected, every field defaulted.
//! - Level and format names are lenient: unknown values fall back to
//!   `INFO` / `TEXT` instead of failing.
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.

use logport_ports::{DEFAULT_ERROR_FIELD_NAME, LogLevel};
use logport_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Default timestamp layout (`2024/01/31 13:45:12.345`).
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";
/// Default directory for the file sink.
pub const DEFAULT_FILE_PATH: &str = "/tmp";
/// Default file name for the file sink.
pub const DEFAULT_FILE_NAME: &str = "application.log";
/// Default rotation size in megabytes.
pub const DEFAULT_FILE_MAX_SIZE_MB: u64 = 100;
/// Default retention for rotated files in days.
pub const DEFAULT_FILE_MAX_AGE_DAYS: u32 = 28;
/// Default CloudWatch prefix field.
pub const DEFAULT_CLOUDWATCH_PREFIX_FIELD: &str = "RequestId";

const FILE_MAX_SIZE_MB_MIN: u64 = 1;
const FILE_MAX_SIZE_MB_MAX: u64 = 1_048_576;
const FILE_MAX_AGE_DAYS_MAX: u32 = 36_500;
const CLOUDWATCH_PREFIX_FIELDS_MAX: usize = 32;

/// Engine backing the logger contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerEngine {
    /// In-crate formatter pipeline (text, JSON, CloudWatch lines).
    #[default]
    Text,
    /// JSON line engine with engine-handle context propagation.
    Json,
    /// `tracing` subscriber layers.
    Tracing,
}

impl LoggerEngine {
    /// Canonical config string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Tracing => "tracing",
        }
    }

    /// Parse an engine name from user or env input.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" | "logrus" => Some(Self::Text),
            "json" | "zerolog" => Some(Self::Json),
            "tracing" | "zap" => Some(Self::Tracing),
            _ => None,
        }
    }
}

impl fmt::Display for LoggerEngine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Line format of a sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// `key=value` lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Prefix fields first, then `key=value`.
    CloudWatch,
}

impl LogFormat {
    /// Canonical config string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Json => "JSON",
            Self::CloudWatch => "CLOUDWATCH",
        }
    }

    /// Parse a format name; unknown names become `Text`.
    #[must_use]
    pub fn from_name(input: &str) -> Self {
        match input.trim().to_ascii_uppercase().as_str() {
            "JSON" => Self::Json,
            "CLOUDWATCH" => Self::CloudWatch,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for LogFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_name(&raw))
    }
}

/// Console stream selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

impl ConsoleStream {
    /// Canonical config string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    /// Parse a stream name from user or env input.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "stdout" => Some(Self::Stdout),
            "stderr" => Some(Self::Stderr),
            _ => None,
        }
    }
}

/// Top-level logger options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggerOptions {
    /// Engine selected by `build_logger`.
    pub engine: LoggerEngine,
    /// Field name used by `with_error`.
    pub error_field_name: String,
    /// Install the built logger as the process-wide global.
    pub install_global: bool,
    /// Timestamp rendering.
    pub time: TimeOptions,
    /// Console sink.
    pub console: ConsoleOptions,
    /// Rolling file sink.
    pub file: FileOptions,
    /// CloudWatch line format settings.
    pub cloudwatch: CloudWatchOptions,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            engine: LoggerEngine::default(),
            error_field_name: DEFAULT_ERROR_FIELD_NAME.to_string(),
            install_global: false,
            time: TimeOptions::default(),
            console: ConsoleOptions::default(),
            file: FileOptions::default(),
            cloudwatch: CloudWatchOptions::default(),
        }
    }
}

/// Timestamp rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TimeOptions {
    /// Omit timestamps entirely.
    pub disabled: bool,
    /// `strftime`-style layout.
    pub format: String,
}

impl Default for TimeOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// Console sink options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ConsoleOptions {
    /// Write to the console.
    pub enabled: bool,
    /// Minimum level.
    pub level: LogLevel,
    /// Line format.
    pub format: LogFormat,
    /// Target stream.
    pub stream: ConsoleStream,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Info,
            format: LogFormat::Text,
            stream: ConsoleStream::Stdout,
        }
    }
}

/// Rolling file sink options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FileOptions {
    /// Write to a file.
    pub enabled: bool,
    /// Minimum level.
    pub level: LogLevel,
    /// Line format.
    pub format: LogFormat,
    /// Directory holding the active file and its backups.
    pub path: String,
    /// Active file name.
    pub name: String,
    /// Rotate once the active file would exceed this size.
    pub max_size_mb: u64,
    /// Gzip rotated files.
    pub compress: bool,
    /// Delete rotated files older than this; `0` keeps them.
    pub max_age_days: u32,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            level: LogLevel::Info,
            format: LogFormat::Text,
            path: DEFAULT_FILE_PATH.to_string(),
            name: DEFAULT_FILE_NAME.to_string(),
            max_size_mb: DEFAULT_FILE_MAX_SIZE_MB,
            compress: true,
            max_age_days: DEFAULT_FILE_MAX_AGE_DAYS,
        }
    }
}

impl FileOptions {
    /// Full path of the active log file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(&self.path).join(&self.name)
    }

    /// Rotation threshold in bytes.
    #[must_use]
    pub const fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

/// CloudWatch line format options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CloudWatchOptions {
    /// Fields whose values are written first, unlabelled, in this order.
    pub prefix_fields: Vec<String>,
    /// Render empty values as `""`.
    pub quote_empty_fields: bool,
}

impl Default for CloudWatchOptions {
    fn default() -> Self {
        Self {
            prefix_fields: vec![DEFAULT_CLOUDWATCH_PREFIX_FIELD.to_string()],
            quote_empty_fields: true,
        }
    }
}

// Builder-style setters; each consumes and returns the options.
impl LoggerOptions {
    /// Select the engine.
    #[must_use]
    pub const fn with_engine(mut self, engine: LoggerEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the error field name.
    #[must_use]
    pub fn with_error_field_name(mut self, name: impl Into<String>) -> Self {
        self.error_field_name = name.into();
        self
    }

    /// Opt in to installing the built logger globally.
    #[must_use]
    pub const fn with_install_global(mut self, install: bool) -> Self {
        self.install_global = install;
        self
    }

    /// Disable or enable timestamps.
    #[must_use]
    pub const fn with_time_disabled(mut self, disabled: bool) -> Self {
        self.time.disabled = disabled;
        self
    }

    /// Set the timestamp layout.
    #[must_use]
    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time.format = format.into();
        self
    }

    /// Enable or disable the console sink.
    #[must_use]
    pub const fn with_console_enabled(mut self, enabled: bool) -> Self {
        self.console.enabled = enabled;
        self
    }

    /// Console threshold.
    #[must_use]
    pub const fn with_console_level(mut self, level: LogLevel) -> Self {
        self.console.level = level;
        self
    }

    /// Console format.
    #[must_use]
    pub const fn with_console_format(mut self, format: LogFormat) -> Self {
        self.console.format = format;
        self
    }

    /// Console stream.
    #[must_use]
    pub const fn with_console_stream(mut self, stream: ConsoleStream) -> Self {
        self.console.stream = stream;
        self
    }

    /// Enable or disable the file sink.
    #[must_use]
    pub const fn with_file_enabled(mut self, enabled: bool) -> Self {
        self.file.enabled = enabled;
        self
    }

    /// File threshold.
    #[must_use]
    pub const fn with_file_level(mut self, level: LogLevel) -> Self {
        self.file.level = level;
        self
    }

    /// File format.
    #[must_use]
    pub const fn with_file_format(mut self, format: LogFormat) -> Self {
        self.file.format = format;
        self
    }

    /// Directory of the file sink.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file.path = path.into();
        self
    }

    /// File name of the file sink.
    #[must_use]
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file.name = name.into();
        self
    }

    /// Rotation size in megabytes.
    #[must_use]
    pub const fn with_file_max_size_mb(mut self, size: u64) -> Self {
        self.file.max_size_mb = size;
        self
    }

    /// Gzip rotated files.
    #[must_use]
    pub const fn with_file_compress(mut self, compress: bool) -> Self {
        self.file.compress = compress;
        self
    }

    /// Retention for rotated files.
    #[must_use]
    pub const fn with_file_max_age_days(mut self, days: u32) -> Self {
        self.file.max_age_days = days;
        self
    }

    /// Replace the CloudWatch prefix fields.
    #[must_use]
    pub fn with_cloudwatch_prefix_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cloudwatch.prefix_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Quote empty CloudWatch values.
    #[must_use]
    pub const fn with_cloudwatch_quote_empty_fields(mut self, quote: bool) -> Self {
        self.cloudwatch.quote_empty_fields = quote;
        self
    }
}

impl LoggerOptions {
    /// Error field name, falling back to `err` when blank.
    #[must_use]
    pub fn effective_error_field_name(&self) -> &str {
        let trimmed = self.error_field_name.trim();
        if trimmed.is_empty() {
            DEFAULT_ERROR_FIELD_NAME
        } else {
            trimmed
        }
    }

    /// Returns true when at least one sink is enabled.
    #[must_use]
    pub const fn has_enabled_sink(&self) -> bool {
        self.console.enabled || self.file.enabled
    }

    /// Validate and normalize the options.
    pub fn validate_and_normalize(mut self) -> Result<Self, ConfigSchemaError> {
        self.error_field_name = self.effective_error_field_name().to_string();
        self.time.validate()?;
        self.file.normalize();
        self.file.validate()?;
        self.cloudwatch.normalize_and_validate()?;
        Ok(self)
    }
}

impl TimeOptions {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.disabled {
            return Ok(());
        }
        if self.format.trim().is_empty() {
            return Err(ConfigSchemaError::EmptyValue {
                section: "time",
                field: "format",
            });
        }
        let malformed = chrono::format::StrftimeItems::new(&self.format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if malformed {
            return Err(ConfigSchemaError::InvalidTimeFormat {
                format: self.format.clone(),
            });
        }
        Ok(())
    }
}

impl FileOptions {
    fn normalize(&mut self) {
        self.path = self.path.trim().to_string();
        self.name = self.name.trim().to_string();
    }

    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if !self.enabled {
            return Ok(());
        }
        if self.path.is_empty() {
            return Err(ConfigSchemaError::EmptyValue {
                section: "file",
                field: "path",
            });
        }
        if self.name.is_empty() {
            return Err(ConfigSchemaError::EmptyValue {
                section: "file",
                field: "name",
            });
        }
        if self.name.contains('/') || self.name.contains('\\') {
            return Err(ConfigSchemaError::InvalidFileName {
                name: self.name.clone(),
            });
        }
        validate_limit(
            "file",
            "maxSizeMb",
            self.max_size_mb,
            FILE_MAX_SIZE_MB_MIN,
            FILE_MAX_SIZE_MB_MAX,
        )?;
        validate_limit(
            "file",
            "maxAgeDays",
            u64::from(self.max_age_days),
            0,
            u64::from(FILE_MAX_AGE_DAYS_MAX),
        )
    }
}

impl CloudWatchOptions {
    fn normalize_and_validate(&mut self) -> Result<(), ConfigSchemaError> {
        let mut seen = Vec::with_capacity(self.prefix_fields.len());
        for field in &self.prefix_fields {
            let trimmed = field.trim();
            if !trimmed.is_empty() && !seen.iter().any(|existing: &String| existing == trimmed) {
                seen.push(trimmed.to_string());
            }
        }
        self.prefix_fields = seen;

        if self.prefix_fields.len() > CLOUDWATCH_PREFIX_FIELDS_MAX {
            return Err(ConfigSchemaError::ListTooLarge {
                section: "cloudwatch",
                field: "prefixFields",
                len: self.prefix_fields.len(),
                max: CLOUDWATCH_PREFIX_FIELDS_MAX,
            });
        }
        Ok(())
    }
}

const fn validate_limit(
    section: &'static str,
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ConfigSchemaError> {
    if value < min || value > max {
        return Err(ConfigSchemaError::LimitOutOfRange {
            section,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Parse logger options from a JSON string, applying validation and normalization.
pub fn parse_logger_options_json(input: &str) -> Result<LoggerOptions, ErrorEnvelope> {
    let options: LoggerOptions = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    options.validate_and_normalize().map_err(Into::into)
}

/// Parse logger options from a TOML string, applying validation and normalization.
pub fn parse_logger_options_toml(input: &str) -> Result<LoggerOptions, ErrorEnvelope> {
    let options: LoggerOptions = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    options.validate_and_normalize().map_err(Into::into)
}

/// Typed validation errors for the options schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// A required string is blank.
    EmptyValue {
        /// Schema section (e.g. `file`).
        section: &'static str,
        /// Field name in the config file (e.g. `name`).
        field: &'static str,
    },
    /// A numeric limit is out of bounds.
    LimitOutOfRange {
        /// Schema section (e.g. `file`).
        section: &'static str,
        /// Field name in the config file (e.g. `maxSizeMb`).
        field: &'static str,
        /// Value provided.
        value: u64,
        /// Minimum allowed value.
        min: u64,
        /// Maximum allowed value.
        max: u64,
    },
    /// A list field exceeds the maximum allowed size.
    ListTooLarge {
        /// Schema section.
        section: &'static str,
        /// Field name in the config file.
        field: &'static str,
        /// Number of entries after normalization.
        len: usize,
        /// Maximum allowed number of entries.
        max: usize,
    },
    /// The timestamp layout contains an unknown specifier.
    InvalidTimeFormat {
        /// Layout provided.
        format: String,
    },
    /// The file name contains a path separator.
    InvalidFileName {
        /// Name provided.
        name: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_value"),
            Self::LimitOutOfRange { .. } => ErrorCode::new("config", "invalid_limit"),
            Self::ListTooLarge { .. } => ErrorCode::new("config", "list_too_large"),
            Self::InvalidTimeFormat { .. } => ErrorCode::new("config", "invalid_time_format"),
            Self::InvalidFileName { .. } => ErrorCode::new("config", "invalid_file_name"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { section, field } => {
                write!(formatter, "{section}.{field} must be non-empty")
            },
            Self::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => write!(
                formatter,
                "{section}.{field} must be within [{min}, {max}] (got {value})"
            ),
            Self::ListTooLarge {
                section,
                field,
                len,
                max,
            } => write!(
                formatter,
                "{section}.{field} must have at most {max} entries (got {len})"
            ),
            Self::InvalidTimeFormat { format } => {
                write!(formatter, "time.format is not a valid layout: {format}")
            },
            Self::InvalidFileName { name } => {
                write!(formatter, "file.name must not contain a path separator: {name}")
            },
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let mut envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::EmptyValue { section, field } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field);
            },
            ConfigSchemaError::LimitOutOfRange {
                section,
                field,
                value,
                min,
                max,
            } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field)
                    .with_metadata("value", value.to_string())
                    .with_metadata("min", min.to_string())
                    .with_metadata("max", max.to_string());
            },
            ConfigSchemaError::ListTooLarge {
                section,
                field,
                len,
                max,
            } => {
                envelope = envelope
                    .with_metadata("section", section)
                    .with_metadata("field", field)
                    .with_metadata("len", len.to_string())
                    .with_metadata("max", max.to_string());
            },
            ConfigSchemaError::InvalidTimeFormat { format } => {
                envelope = envelope.with_metadata("format", format);
            },
            ConfigSchemaError::InvalidFileName { name } => {
                envelope = envelope.with_metadata("name", name);
            },
        }

        envelope
    }
}
