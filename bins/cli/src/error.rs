use logport_facade::ErrorEnvelope;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    InvalidInput = 2,
    Io = 3,
    Internal = 1,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub enum CliError {
    InvalidInput(String),
    Logger(ErrorEnvelope),
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::Logger(envelope) if envelope.code.namespace() == "sink" => ExitCode::Io,
            Self::Logger(_) => ExitCode::InvalidInput,
            Self::Io(_) => ExitCode::Io,
            Self::Serialization(_) => ExitCode::Internal,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(formatter, "invalid input: {message}"),
            Self::Logger(envelope) => {
                write!(formatter, "{}: {}", envelope.code, envelope.message)
            },
            Self::Io(error) => write!(formatter, "io error: {error}"),
            Self::Serialization(error) => write!(formatter, "serialization error: {error}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ErrorEnvelope> for CliError {
    fn from(error: ErrorEnvelope) -> Self {
        Self::Logger(error)
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logport_facade::ErrorCode;

    #[test]
    fn sink_failures_map_to_io_exit() {
        let error = CliError::from(ErrorEnvelope::expected(
            ErrorCode::sink_open_failed(),
            "cannot open",
        ));
        assert_eq!(error.exit_code(), ExitCode::Io);
    }

    #[test]
    fn config_failures_map_to_invalid_input() {
        let error = CliError::from(ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_env"),
            "bad env",
        ));
        assert_eq!(error.exit_code(), ExitCode::InvalidInput);
        assert!(error.to_string().starts_with("config:invalid_env"));
    }
}
