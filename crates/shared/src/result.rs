//! Result helpers for shared error handling.

use crate::errors::{ErrorCode, ErrorEnvelope};

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Extension helpers for attaching workspace error context.
pub trait ResultExt<T> {
    /// Convert an I/O failure into an envelope with an explicit code and path.
    fn with_io_context(self, code: ErrorCode, path: &str) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_io_context(self, code: ErrorCode, path: &str) -> Result<T> {
        self.map_err(|error| ErrorEnvelope::from_io(code, &error).with_metadata("path", path))
    }
}
