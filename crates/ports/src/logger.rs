//! The logger contract every adapter implements.

use crate::context::LogContext;
use crate::fields::Fields;
use crate::level::LogLevel;
use crate::sink::SharedSink;
use crate::type_info::TypeInfo;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Field name used by `with_error` unless configured otherwise.
pub const DEFAULT_ERROR_FIELD_NAME: &str = "err";

/// Shared handle to a logger.
pub type SharedLogger = Arc<dyn Logger>;

/// Uniform logging interface.
///
/// Callers program against this trait only. Nothing here returns a
/// `Result`: sink failures are swallowed by the adapter, `fatal` ends the
/// process and `panic` unwinds.
///
/// Messages are `fmt::Arguments`, so the plain and templated call forms
/// are the same call:
///
/// ```
/// # use logport_ports::Logger;
/// # fn demo(logger: &dyn Logger) {
/// logger.info(format_args!("main method."));
/// logger.info(format_args!("{} method.", "foo"));
/// # }
/// ```
pub trait Logger: Send + Sync + fmt::Debug {
    /// Emit one record at `level`. Records below the sink threshold are dropped.
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);

    /// Trace record.
    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    /// Debug record.
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    /// Info record.
    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    /// Warn record.
    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    /// Error record.
    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    /// Unleveled print; lands at INFO.
    fn printf(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    /// Emit at FATAL, flush, then exit the process with status 1.
    fn fatal(&self, args: fmt::Arguments<'_>);

    /// Emit at PANIC, flush, then unwind with the rendered message.
    fn panic(&self, args: fmt::Arguments<'_>);

    /// Derive a logger with one extra field.
    fn with_field(&self, key: &str, value: Value) -> SharedLogger {
        let mut fields = Fields::new();
        fields.insert(key, value);
        self.with_fields(&fields)
    }

    /// Derive a logger whose fields are `self.fields() ∪ fields`.
    fn with_fields(&self, fields: &Fields) -> SharedLogger;

    /// Derive a logger carrying the error message under the error field.
    fn with_error(&self, error: &dyn std::error::Error) -> SharedLogger {
        self.with_field(self.error_field_name(), Value::String(error.to_string()))
    }

    /// Derive a logger carrying `type.name` and `type.module`.
    fn with_type_of(&self, info: &TypeInfo) -> SharedLogger {
        self.with_fields(&info.to_fields())
    }

    /// Push this logger's fields onto a derived context.
    fn to_context(&self, ctx: &LogContext) -> LogContext;

    /// Rebuild a logger from a context produced by `to_context`.
    fn from_context(&self, ctx: &LogContext) -> SharedLogger;

    /// Snapshot of attached fields.
    fn fields(&self) -> Fields;

    /// Sink (or fan-out of sinks) this logger writes to.
    fn output(&self) -> SharedSink;

    /// Field name used by `with_error`.
    fn error_field_name(&self) -> &str {
        DEFAULT_ERROR_FIELD_NAME
    }
}
