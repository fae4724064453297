use super::{
    Formatter, LEVEL_KEY, MESSAGE_KEY, Record, TIME_KEY, push_logfmt_pair, render_time,
    resolve_key,
};
use logport_ports::value_to_text;

const QUOTE_EMPTY: bool = false;

/// logfmt text lines: `time="…" level=info msg="…" key=value`.
///
/// Fields are sorted by key. `time` is omitted when no timestamp format is
/// set.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    time_format: Option<String>,
}

impl TextFormatter {
    /// Formatter stamping records with `time_format`, or without time when `None`.
    #[must_use]
    pub const fn new(time_format: Option<String>) -> Self {
        Self { time_format }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &Record<'_>) -> String {
        let mut line = String::new();
        let reserved: &[&str] = if self.time_format.is_some() {
            &[TIME_KEY, LEVEL_KEY, MESSAGE_KEY]
        } else {
            &[LEVEL_KEY, MESSAGE_KEY]
        };

        if let Some(time_format) = &self.time_format {
            let stamp = render_time(&record.time, time_format);
            push_logfmt_pair(&mut line, TIME_KEY, &stamp, QUOTE_EMPTY);
        }
        push_logfmt_pair(&mut line, LEVEL_KEY, record.level.as_str(), QUOTE_EMPTY);
        push_logfmt_pair(&mut line, MESSAGE_KEY, record.message, QUOTE_EMPTY);
        for (key, value) in record.fields {
            let key = resolve_key(key, reserved);
            push_logfmt_pair(&mut line, &key, &value_to_text(value), QUOTE_EMPTY);
        }
        line.push('\n');
        line
    }
}
