//! Output contract for rendered log lines.

use std::fmt;
use std::sync::Arc;

/// A sink that receives pre-formatted log lines.
///
/// Implementations serialize writes internally so one line is never
/// interleaved with another. Write failures are swallowed.
pub trait LogSink: Send + Sync + fmt::Debug {
    /// Write one line. `line` carries its trailing newline.
    fn write_line(&self, line: &str);

    /// Flush buffered output.
    fn flush(&self) {}
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn LogSink>;
