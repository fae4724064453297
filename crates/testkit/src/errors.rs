//! Test fixtures for shared error codes and envelopes.

use logport_shared::{ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::io(),
        ErrorCode::internal(),
        ErrorCode::sink_open_failed(),
        ErrorCode::sink_rotate_failed(),
    ]
}

/// An invalid input error fixture.
pub fn invalid_input_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid input")
}

/// A sink open failure fixture, as produced for an unwritable log path.
pub fn sink_open_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::sink_open_failed(), "failed to open log file")
        .with_metadata("path", "/nonexistent/application.log")
}
