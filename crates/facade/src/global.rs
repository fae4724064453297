//! Process-wide logger handle.
//!
//! [`LoggerHandle`] is an ordinary value and can be injected where a global
//! is unwanted; [`global()`] is one lazily created instance of it, starting
//! out with a [`NoopLogger`].

use crate::noop::NoopLogger;
use logport_ports::{
    Fields, LogContext, LogLevel, Logger, SharedLogger, SharedSink, TypeInfo,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Lock-guarded holder of one logger.
///
/// Replacement is wholesale and last writer wins. Delegated calls hold the
/// read lock for their duration.
pub struct LoggerHandle {
    current: RwLock<SharedLogger>,
}

impl LoggerHandle {
    /// Handle holding `logger`.
    #[must_use]
    pub fn new(logger: SharedLogger) -> Self {
        Self {
            current: RwLock::new(logger),
        }
    }

    /// Replace the held logger.
    pub fn set(&self, logger: SharedLogger) {
        *self.current.write() = logger;
    }

    /// The held logger.
    #[must_use]
    pub fn get(&self) -> SharedLogger {
        Arc::clone(&self.current.read())
    }

    /// Leveled record through the held logger.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.current.read().log(level, args);
    }

    /// Trace record.
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.current.read().trace(args);
    }

    /// Debug record.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.current.read().debug(args);
    }

    /// Info record.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.current.read().info(args);
    }

    /// Warn record.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.current.read().warn(args);
    }

    /// Error record.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.current.read().error(args);
    }

    /// Unleveled print at INFO.
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.current.read().printf(args);
    }

    /// Fatal record; the held logger decides whether the process exits.
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.current.read().fatal(args);
    }

    /// Panic record; the held logger decides whether to unwind.
    pub fn panic(&self, args: fmt::Arguments<'_>) {
        self.current.read().panic(args);
    }

    /// Logger derived from the held one with an extra field.
    #[must_use]
    pub fn with_field(&self, key: &str, value: impl Into<Value>) -> SharedLogger {
        self.current.read().with_field(key, value.into())
    }

    /// Logger derived from the held one with extra fields.
    #[must_use]
    pub fn with_fields(&self, fields: &Fields) -> SharedLogger {
        self.current.read().with_fields(fields)
    }

    /// Logger derived from the held one carrying `error`.
    #[must_use]
    pub fn with_error(&self, error: &dyn std::error::Error) -> SharedLogger {
        self.current.read().with_error(error)
    }

    /// Logger derived from the held one carrying type identity fields.
    #[must_use]
    pub fn with_type_of(&self, info: &TypeInfo) -> SharedLogger {
        self.current.read().with_type_of(info)
    }

    /// Push the held logger's fields onto a derived context.
    #[must_use]
    pub fn to_context(&self, ctx: &LogContext) -> LogContext {
        self.current.read().to_context(ctx)
    }

    /// Rebuild a logger from `ctx` using the held logger.
    #[must_use]
    pub fn from_context(&self, ctx: &LogContext) -> SharedLogger {
        self.current.read().from_context(ctx)
    }

    /// Fields of the held logger.
    #[must_use]
    pub fn fields(&self) -> Fields {
        self.current.read().fields()
    }

    /// Output of the held logger.
    #[must_use]
    pub fn output(&self) -> SharedSink {
        self.current.read().output()
    }

    /// Error field name of the held logger.
    #[must_use]
    pub fn error_field_name(&self) -> String {
        self.current.read().error_field_name().to_string()
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self::new(NoopLogger::shared())
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LoggerHandle")
            .field("current", &*self.current.read())
            .finish()
    }
}

static GLOBAL: LazyLock<LoggerHandle> = LazyLock::new(LoggerHandle::default);

/// The process-wide handle.
#[must_use]
pub fn global() -> &'static LoggerHandle {
    &GLOBAL
}

/// Replace the process-wide logger.
pub fn set_global_logger(logger: SharedLogger) {
    global().set(logger);
}

/// The process-wide logger.
#[must_use]
pub fn global_logger() -> SharedLogger {
    global().get()
}

/// Trace record through the global logger.
pub fn trace(args: fmt::Arguments<'_>) {
    global().trace(args);
}

/// Debug record through the global logger.
pub fn debug(args: fmt::Arguments<'_>) {
    global().debug(args);
}

/// Info record through the global logger.
pub fn info(args: fmt::Arguments<'_>) {
    global().info(args);
}

/// Warn record through the global logger.
pub fn warn(args: fmt::Arguments<'_>) {
    global().warn(args);
}

/// Error record through the global logger.
pub fn error(args: fmt::Arguments<'_>) {
    global().error(args);
}

/// Unleveled print through the global logger.
pub fn printf(args: fmt::Arguments<'_>) {
    global().printf(args);
}

/// Fatal record through the global logger.
pub fn fatal(args: fmt::Arguments<'_>) {
    global().fatal(args);
}

/// Panic record through the global logger.
pub fn panic(args: fmt::Arguments<'_>) {
    global().panic(args);
}

/// Logger derived from the global one with an extra field.
#[must_use]
pub fn with_field(key: &str, value: impl Into<Value>) -> SharedLogger {
    global().with_field(key, value)
}

/// Logger derived from the global one with extra fields.
#[must_use]
pub fn with_fields(fields: &Fields) -> SharedLogger {
    global().with_fields(fields)
}

/// Logger derived from the global one carrying `error`.
#[must_use]
pub fn with_error(error: &dyn std::error::Error) -> SharedLogger {
    global().with_error(error)
}

/// Logger derived from the global one carrying type identity fields.
#[must_use]
pub fn with_type_of(info: &TypeInfo) -> SharedLogger {
    global().with_type_of(info)
}

/// Push the global logger's fields onto a derived context.
#[must_use]
pub fn to_context(ctx: &LogContext) -> LogContext {
    global().to_context(ctx)
}

/// Rebuild a logger from `ctx` using the global logger.
#[must_use]
pub fn from_context(ctx: &LogContext) -> SharedLogger {
    global().from_context(ctx)
}

/// Fields of the global logger.
#[must_use]
pub fn fields() -> Fields {
    global().fields()
}

/// Output of the global logger.
#[must_use]
pub fn output() -> SharedSink {
    global().output()
}
