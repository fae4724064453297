//! Closed set of log levels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Log level, ordered from most to least verbose.
///
/// `Panic` and `Fatal` sit above `Error`: a sink configured at `ERROR`
/// still receives both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Trace.
    Trace,
    /// Debug.
    Debug,
    /// Info.
    #[default]
    Info,
    /// Warn.
    Warn,
    /// Error.
    Error,
    /// Emitted before unwinding.
    Panic,
    /// Emitted before the process exits.
    Fatal,
}

impl LogLevel {
    /// Every level in ascending severity.
    pub const ALL: [Self; 7] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Panic,
        Self::Fatal,
    ];

    /// Parse a level name, case-insensitively. Unknown names become `Info`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::parse_known(name).unwrap_or(Self::Info)
    }

    /// Parse a level name, returning `None` for names outside the closed set.
    #[must_use]
    pub fn parse_known(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_upper_str().eq_ignore_ascii_case(name))
            .or_else(|| name.eq_ignore_ascii_case("warning").then_some(Self::Warn))
    }

    /// Lowercase name, as rendered in text and JSON lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warning",
            Self::Error => "error",
            Self::Panic => "panic",
            Self::Fatal => "fatal",
        }
    }

    /// Uppercase name, as written in options.
    #[must_use]
    pub const fn as_upper_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Panic => "PANIC",
            Self::Fatal => "FATAL",
        }
    }

    /// Returns true when a record at `self` passes a threshold of `min`.
    #[must_use]
    pub fn passes(self, min: Self) -> bool {
        self >= min
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_upper_str())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_upper_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_name(&raw))
    }
}
