//! Logger that discards everything.

use logport_adapters::sink::discard;
use logport_ports::{Fields, LogContext, LogLevel, Logger, SharedLogger, SharedSink};
use std::fmt;
use std::sync::Arc;

/// Logger whose every method is a no-op.
///
/// `fatal` and `panic` return normally. Derived loggers are no-op loggers
/// too, and contexts pass through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl NoopLogger {
    /// Shared no-op logger.
    #[must_use]
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _args: fmt::Arguments<'_>) {}

    fn fatal(&self, _args: fmt::Arguments<'_>) {}

    fn panic(&self, _args: fmt::Arguments<'_>) {}

    fn with_fields(&self, _fields: &Fields) -> SharedLogger {
        Self::shared()
    }

    fn to_context(&self, ctx: &LogContext) -> LogContext {
        ctx.clone()
    }

    fn from_context(&self, _ctx: &LogContext) -> SharedLogger {
        Self::shared()
    }

    fn fields(&self) -> Fields {
        Fields::new()
    }

    fn output(&self) -> SharedSink {
        discard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_call_returns_normally() {
        let logger = NoopLogger;
        logger.trace(format_args!("t"));
        logger.info(format_args!("i"));
        logger.printf(format_args!("p"));
        logger.fatal(format_args!("f"));
        logger.panic(format_args!("p"));
    }

    #[test]
    fn derived_loggers_carry_no_fields() {
        let logger = NoopLogger.with_field("ID", json!("1"));
        assert!(logger.fields().is_empty());
        assert_eq!(logger.error_field_name(), "err");
    }

    #[test]
    fn context_passes_through() {
        let ctx = LogContext::background();
        let out = NoopLogger.to_context(&ctx);
        assert!(out.is_empty());
        assert!(NoopLogger.from_context(&out).fields().is_empty());
    }
}
