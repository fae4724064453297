use super::{Formatter, LEVEL_KEY, MESSAGE_KEY, Record, TIME_KEY, render_time, resolve_key};
use serde_json::{Map, Value};

const SERIALIZE_FAILED_LINE: &str =
    "{\"level\":\"error\",\"msg\":\"log serialization failed\"}\n";

/// One JSON object per line with user fields flattened at the top level.
///
/// User keys that clash with the time, level or message key move to
/// `fields.<key>`.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    time_format: Option<String>,
    message_key: String,
}

impl JsonFormatter {
    /// Formatter stamping records with `time_format`, or without time when `None`.
    #[must_use]
    pub fn new(time_format: Option<String>) -> Self {
        Self {
            time_format,
            message_key: MESSAGE_KEY.to_string(),
        }
    }

    /// Use `key` for the message instead of `msg`.
    #[must_use]
    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = key.into();
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &Record<'_>) -> String {
        let reserved = [TIME_KEY, LEVEL_KEY, self.message_key.as_str()];
        let mut payload = Map::new();
        for (key, value) in record.fields {
            payload.insert(resolve_key(key, &reserved), value.clone());
        }
        if let Some(time_format) = &self.time_format {
            payload.insert(
                TIME_KEY.to_string(),
                Value::String(render_time(&record.time, time_format)),
            );
        }
        payload.insert(
            LEVEL_KEY.to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        payload.insert(
            self.message_key.clone(),
            Value::String(record.message.to_string()),
        );

        serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| SERIALIZE_FAILED_LINE.to_string(),
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        )
    }
}
