//! # logport-adapters
//!
//! Logger engines behind the `Logger` contract, plus the sinks and line
//! formatters they write through.
//! This crate depends on `ports`, `shared` and `config`.

pub mod format;
pub mod json_logger;
pub mod rolling;
pub mod sink;
pub mod terminate;
pub mod text_logger;
pub mod tracing_logger;

mod pipeline;

pub use format::{CloudWatchFormatter, Formatter, JsonFormatter, Record, TextFormatter};
pub use json_logger::JsonLogger;
pub use rolling::{RollingConfig, RollingFileSink, SinkError};
pub use sink::{DiscardSink, FanoutSink, SinkMakeWriter, SinkSet, SinkWriter, StderrSink, StdoutSink};
pub use terminate::FATAL_EXIT_CODE;
pub use text_logger::TextLogger;
pub use tracing_logger::TracingLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
