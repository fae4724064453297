use super::{Formatter, LEVEL_KEY, MESSAGE_KEY, Record, push_logfmt_pair, push_logfmt_value, resolve_key};
use logport_ports::value_to_text;

/// CloudWatch Logs lines: prefix field values first, then logfmt.
///
/// No timestamp is written; CloudWatch stamps ingestion time itself.
/// Prefix fields missing from a record are skipped.
#[derive(Debug, Clone)]
pub struct CloudWatchFormatter {
    prefix_fields: Vec<String>,
    quote_empty_fields: bool,
}

impl CloudWatchFormatter {
    /// Formatter writing `prefix_fields` values ahead of the logfmt body.
    #[must_use]
    pub const fn new(prefix_fields: Vec<String>, quote_empty_fields: bool) -> Self {
        Self {
            prefix_fields,
            quote_empty_fields,
        }
    }
}

impl Formatter for CloudWatchFormatter {
    fn format(&self, record: &Record<'_>) -> String {
        let quote = self.quote_empty_fields;
        let mut line = String::new();
        for prefix in &self.prefix_fields {
            if let Some(value) = record.fields.get(prefix) {
                if !line.is_empty() {
                    line.push(' ');
                }
                push_logfmt_value(&mut line, &value_to_text(value), quote);
            }
        }

        push_logfmt_pair(&mut line, LEVEL_KEY, record.level.as_str(), quote);
        push_logfmt_pair(&mut line, MESSAGE_KEY, record.message, quote);
        for (key, value) in record.fields {
            if self.prefix_fields.iter().any(|prefix| prefix == key) {
                continue;
            }
            let key = resolve_key(key, &[LEVEL_KEY, MESSAGE_KEY]);
            push_logfmt_pair(&mut line, &key, &value_to_text(value), quote);
        }
        line.push('\n');
        line
    }
}
