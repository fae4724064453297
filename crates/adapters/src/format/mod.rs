//! Line formatters: one [`Record`] in, one newline-terminated line out.

mod cloudwatch;
mod json;
mod text;

pub use cloudwatch::CloudWatchFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use chrono::{DateTime, Local};
use logport_config::{CloudWatchOptions, LogFormat, TimeOptions};
use logport_ports::{Fields, LogLevel};
use std::fmt::{self, Write as _};

/// Key of the timestamp in rendered lines.
pub const TIME_KEY: &str = "time";
/// Key of the level in rendered lines.
pub const LEVEL_KEY: &str = "level";
/// Key of the message in text and JSON lines.
pub const MESSAGE_KEY: &str = "msg";
/// Prefix applied to user fields that clash with a reserved key.
pub const CLASH_PREFIX: &str = "fields.";

/// One log record handed to a formatter.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Capture time.
    pub time: DateTime<Local>,
    /// Record level.
    pub level: LogLevel,
    /// Rendered message.
    pub message: &'a str,
    /// Fields attached to the emitting logger.
    pub fields: &'a Fields,
}

/// Renders records into lines.
pub trait Formatter: Send + Sync + fmt::Debug {
    /// Render `record`; the result ends with `\n`.
    fn format(&self, record: &Record<'_>) -> String;
}

/// Formatter for `format`, honouring the time and CloudWatch options.
#[must_use]
pub fn formatter_for(
    format: LogFormat,
    time: &TimeOptions,
    cloudwatch: &CloudWatchOptions,
) -> Box<dyn Formatter> {
    let time_format = (!time.disabled).then(|| time.format.clone());
    match format {
        LogFormat::Text => Box::new(TextFormatter::new(time_format)),
        LogFormat::Json => Box::new(JsonFormatter::new(time_format)),
        LogFormat::CloudWatch => Box::new(CloudWatchFormatter::new(
            cloudwatch.prefix_fields.clone(),
            cloudwatch.quote_empty_fields,
        )),
    }
}

/// Render `time` with a strftime format; an invalid format yields "".
pub(crate) fn render_time(time: &DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_err() {
        out.clear();
    }
    out
}

/// Key a user field is rendered under, given the reserved keys.
pub(crate) fn resolve_key(key: &str, reserved: &[&str]) -> String {
    if reserved.contains(&key) {
        format!("{CLASH_PREFIX}{key}")
    } else {
        key.to_string()
    }
}

/// logfmt value: bare when every char is safe, quoted otherwise.
pub(crate) fn push_logfmt_value(out: &mut String, value: &str, quote_empty: bool) {
    if needs_quoting(value, quote_empty) {
        out.push_str(&format!("{value:?}"));
    } else {
        out.push_str(value);
    }
}

/// logfmt `key=value` pair, space separated from what precedes it.
pub(crate) fn push_logfmt_pair(out: &mut String, key: &str, value: &str, quote_empty: bool) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(key);
    out.push('=');
    push_logfmt_value(out, value, quote_empty);
}

fn needs_quoting(value: &str, quote_empty: bool) -> bool {
    if value.is_empty() {
        return quote_empty;
    }
    !value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_values_stay_bare() {
        let mut out = String::new();
        push_logfmt_pair(&mut out, "path", "/var/log/a-b_c.log", false);
        assert_eq!(out, "path=/var/log/a-b_c.log");
    }

    #[test]
    fn unsafe_values_are_quoted_and_escaped() {
        let mut out = String::new();
        push_logfmt_pair(&mut out, "msg", "say \"hi\"", false);
        assert_eq!(out, r#"msg="say \"hi\"""#);
    }

    #[test]
    fn empty_values_follow_quote_empty() {
        let mut bare = String::new();
        push_logfmt_pair(&mut bare, "k", "", false);
        let mut quoted = String::new();
        push_logfmt_pair(&mut quoted, "k", "", true);
        assert_eq!(bare, "k=");
        assert_eq!(quoted, r#"k="""#);
    }

    #[test]
    fn invalid_time_format_renders_empty() {
        assert_eq!(render_time(&Local::now(), "%Q"), "");
    }

    #[test]
    fn reserved_keys_are_prefixed() {
        assert_eq!(resolve_key("level", &[LEVEL_KEY, MESSAGE_KEY]), "fields.level");
        assert_eq!(resolve_key("user", &[LEVEL_KEY, MESSAGE_KEY]), "user");
    }
}
