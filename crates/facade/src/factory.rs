//! Engine selection and options loading.

use crate::global::set_global_logger;
use logport_adapters::{JsonLogger, TextLogger, TracingLogger};
use logport_config::{
    LoggerEngine, LoggerEnv, LoggerOptions, load_logger_options_from_path, to_pretty_json,
};
use logport_ports::SharedLogger;
use logport_shared::{ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Build the logger `options.engine` names, best effort.
///
/// Installs it as the global logger when `installGlobal` is set.
#[must_use]
pub fn build_logger(options: &LoggerOptions) -> SharedLogger {
    let logger: SharedLogger = match options.engine {
        LoggerEngine::Text => Arc::new(TextLogger::new(options)),
        LoggerEngine::Json => Arc::new(JsonLogger::new(options)),
        LoggerEngine::Tracing => Arc::new(TracingLogger::new(options)),
    };
    finish(options, logger)
}

/// Build the logger `options.engine` names, failing on invalid options or
/// sinks that cannot be opened.
pub fn try_build_logger(options: &LoggerOptions) -> Result<SharedLogger> {
    let logger: SharedLogger = match options.engine {
        LoggerEngine::Text => Arc::new(TextLogger::try_new(options)?),
        LoggerEngine::Json => Arc::new(JsonLogger::try_new(options)?),
        LoggerEngine::Tracing => Arc::new(TracingLogger::try_new(options)?),
    };
    Ok(finish(options, logger))
}

fn finish(options: &LoggerOptions, logger: SharedLogger) -> SharedLogger {
    tracing::debug!(
        engine = options.engine.as_str(),
        install_global = options.install_global,
        "logger built"
    );
    if options.install_global {
        set_global_logger(Arc::clone(&logger));
    }
    logger
}

/// Load options from env, an optional file and optional JSON overrides.
pub fn load_options(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<LoggerOptions> {
    let env = LoggerEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    load_logger_options_from_path(config_path, overrides_json, &env)
}

/// Load and validate the effective options, returning deterministic pretty JSON.
pub fn load_effective_options_json(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    overrides_json: Option<&str>,
) -> Result<String> {
    let options = load_options(env, config_path, overrides_json)?;
    to_pretty_json(&options)
}

/// Validate that the provided env overrides can be parsed and merged.
pub fn validate_env_parsing(env: &BTreeMap<String, String>) -> Result<()> {
    load_options(env, None, None).map(|_| ())
}
