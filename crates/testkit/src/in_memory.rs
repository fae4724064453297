//! In-memory implementations of the sink and logger contracts.
//!
//! These implementations are intended for:
//! - Unit/integration tests
//! - Contract tests for the ports layer
//! - Observing what a facade or global handle delegates to

use logport_ports::{
    ContextKey, Fields, LogContext, LogLevel, LogSink, Logger, SharedLogger, SharedSink,
    fields_from_context, to_context,
};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Sink collecting lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
    flushes: Mutex<usize>,
}

impl MemorySink {
    /// Shared empty sink.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drain captured lines.
    pub fn take(&self) -> Vec<String> {
        let mut guard = self.lines.lock().expect("memory sink lock");
        std::mem::take(&mut *guard)
    }

    /// Copy of captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("memory sink lock").clone()
    }

    /// Captured lines concatenated.
    pub fn contents(&self) -> String {
        self.lines().concat()
    }

    /// Number of `flush` calls observed.
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock().expect("memory sink lock")
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        let mut guard = self.lines.lock().expect("memory sink lock");
        guard.push(line.to_string());
    }

    fn flush(&self) {
        *self.flushes.lock().expect("memory sink lock") += 1;
    }
}

/// One record captured by [`RecordingLogger`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEntry {
    pub level: LogLevel,
    pub message: String,
    pub fields: Fields,
}

struct RecordingContextKey;

impl ContextKey for RecordingContextKey {
    type Value = Fields;
}

/// Logger that records entries instead of formatting them.
///
/// Derived loggers share the record list. `fatal` and `panic` record their
/// entry and return, so tests can observe them without ending the process.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    entries: Arc<Mutex<Vec<RecordedEntry>>>,
    sink: Arc<MemorySink>,
    fields: Fields,
}

impl RecordingLogger {
    /// Fresh logger with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded entries.
    pub fn take(&self) -> Vec<RecordedEntry> {
        let mut guard = self.entries.lock().expect("recording logger lock");
        std::mem::take(&mut *guard)
    }

    /// Messages of the recorded entries, in order.
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("recording logger lock")
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Memory sink returned by `output()`; each record also lands here.
    pub fn sink(&self) -> Arc<MemorySink> {
        Arc::clone(&self.sink)
    }

    fn record(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        self.sink.write_line(&format!("{} {message}\n", level.as_str()));
        self.entries
            .lock()
            .expect("recording logger lock")
            .push(RecordedEntry {
                level,
                message,
                fields: self.fields.clone(),
            });
    }
}

impl fmt::Debug for RecordingLogger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RecordingLogger")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.record(level, args);
    }

    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.record(LogLevel::Fatal, args);
    }

    fn panic(&self, args: fmt::Arguments<'_>) {
        self.record(LogLevel::Panic, args);
    }

    fn with_fields(&self, fields: &Fields) -> SharedLogger {
        Arc::new(Self {
            entries: Arc::clone(&self.entries),
            sink: Arc::clone(&self.sink),
            fields: self.fields.merge(fields),
        })
    }

    fn to_context(&self, ctx: &LogContext) -> LogContext {
        to_context::<RecordingContextKey>(ctx, &self.fields)
    }

    fn from_context(&self, ctx: &LogContext) -> SharedLogger {
        self.with_fields(&fields_from_context::<RecordingContextKey>(Some(ctx)))
    }

    fn fields(&self) -> Fields {
        self.fields.clone()
    }

    fn output(&self) -> SharedSink {
        self.sink.clone()
    }
}
