//! # logport-facade
//!
//! Entry point for applications: the global logger handle, the no-op
//! logger, formatting macros and engine selection from options.
//! This crate depends on `adapters`, `config`, `ports` and `shared`.
//!
//! ```
//! use logport_facade::{LogContext, Logger, LoggerOptions, build_logger, log_info};
//!
//! let options = LoggerOptions::default().with_console_enabled(false);
//! let logger = build_logger(&options).with_field("main_field", "example".into());
//! let ctx = logger.to_context(&LogContext::background());
//! log_info!(logger.from_context(&ctx), "{} method.", "foo");
//! ```

pub mod factory;
pub mod global;
mod macros;
pub mod noop;

pub use factory::{
    build_logger, load_effective_options_json, load_options, try_build_logger,
    validate_env_parsing,
};
pub use global::{LoggerHandle, global, global_logger, set_global_logger};
pub use noop::NoopLogger;

pub use logport_adapters::{FATAL_EXIT_CODE, JsonLogger, SinkSet, TextLogger, TracingLogger};
pub use logport_config::{
    ConsoleStream, LogFormat, LoggerEngine, LoggerEnv, LoggerOptions, to_pretty_json,
    to_pretty_toml,
};
pub use logport_ports::{
    DEFAULT_ERROR_FIELD_NAME, Fields, LogContext, LogLevel, LogSink, Logger, SharedLogger,
    SharedSink, TypeInfo,
};
pub use logport_shared::{ErrorCode, ErrorEnvelope, Result};

/// Returns the facade crate version.
#[must_use]
pub const fn facade_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use logport_testkit::RecordingLogger;
    use std::sync::Arc;

    #[test]
    fn facade_crate_compiles() {
        assert!(!facade_crate_version().is_empty());
    }

    #[test]
    fn explicit_logger_macros_accept_format_arguments() {
        let recording = RecordingLogger::new();
        let logger: SharedLogger = Arc::new(recording.clone());

        crate::log_info!(logger, "{} method.", "foo");
        crate::log_warn!(logger, "plain");
        crate::log_error!(&recording, "count={}", 3);

        assert_eq!(recording.messages(), ["foo method.", "plain", "count=3"]);
    }
}
