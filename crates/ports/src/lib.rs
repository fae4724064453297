//! # logport-ports
//!
//! The logger contract and the small value types it speaks in.
//!
//! This crate has no workspace dependencies: adapters, the facade and
//! callers all depend on it, never the other way around.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod context;
pub mod fields;
pub mod level;
pub mod logger;
pub mod sink;
pub mod type_info;

pub use context::{ContextKey, LogContext, fields_from_context, to_context};
pub use fields::{Fields, value_to_text};
pub use level::LogLevel;
pub use logger::{DEFAULT_ERROR_FIELD_NAME, Logger, SharedLogger};
pub use sink::{LogSink, SharedSink};
pub use type_info::{TYPE_MODULE_FIELD, TYPE_NAME_FIELD, TypeInfo};
