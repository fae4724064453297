//! # logport-config
//!
//! Logger options schema, validation, env overrides and file loading.
//! This crate depends on `ports` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Options loading helpers (env + file + overrides).
pub mod load;
/// Options schema types and helpers.
pub mod schema;

pub use schema::{
    CloudWatchOptions, ConfigSchemaError, ConsoleOptions, ConsoleStream, DEFAULT_FILE_MAX_AGE_DAYS,
    DEFAULT_FILE_MAX_SIZE_MB, DEFAULT_FILE_NAME, DEFAULT_FILE_PATH, DEFAULT_TIME_FORMAT,
    FileOptions, LogFormat, LoggerEngine, LoggerOptions, TimeOptions, parse_logger_options_json,
    parse_logger_options_toml,
};

pub use env::{EnvParseError, LoggerEnv, apply_env_overrides};
pub use load::{
    load_logger_options_from_path, load_logger_options_from_sources, load_logger_options_std_env,
    to_pretty_json, to_pretty_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
