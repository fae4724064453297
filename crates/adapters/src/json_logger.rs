//! Structured JSON logger adapter.
//!
//! Every sink receives one JSON object per line, whatever format the
//! options name. Contexts carry the engine handle itself, so a logger
//! rebuilt from a context writes where the pushing logger wrote.

use crate::format::{Formatter, JsonFormatter};
use crate::pipeline::Pipeline;
use crate::sink::SinkSet;
use crate::terminate;
use logport_config::LoggerOptions;
use logport_ports::{ContextKey, Fields, LogContext, LogLevel, Logger, SharedLogger, SharedSink};
use logport_shared::{ErrorEnvelope, Result};
use std::fmt;
use std::sync::Arc;

/// Message key in JSON engine lines.
pub const JSON_MESSAGE_KEY: &str = "message";

#[derive(Debug)]
struct JsonEngine {
    pipeline: Pipeline,
    error_field_name: String,
}

/// Engine handle plus accumulated fields, as stored in a context.
#[derive(Debug, Clone)]
struct JsonHandle {
    engine: Arc<JsonEngine>,
    fields: Fields,
}

struct JsonContextKey;

impl ContextKey for JsonContextKey {
    type Value = JsonHandle;
}

/// JSON logger emitting one object per line.
#[derive(Debug, Clone)]
pub struct JsonLogger {
    engine: Arc<JsonEngine>,
    fields: Fields,
}

impl JsonLogger {
    /// Validate `options` and open its sinks.
    ///
    /// # Errors
    /// Returns the validation error, or `sink:open_failed` when the log file
    /// cannot be opened.
    pub fn try_new(options: &LoggerOptions) -> Result<Self> {
        let options = options
            .clone()
            .validate_and_normalize()
            .map_err(ErrorEnvelope::from)?;
        let sinks = SinkSet::open(&options)?;
        Ok(Self::with_sinks(&options, sinks))
    }

    /// Best-effort construction; an unopenable file sink becomes a discard sink.
    #[must_use]
    pub fn new(options: &LoggerOptions) -> Self {
        Self::with_sinks(options, SinkSet::open_lossy(options))
    }

    /// Build over caller-provided sinks; levels come from `options`.
    #[must_use]
    pub fn with_sinks(options: &LoggerOptions, sinks: SinkSet) -> Self {
        let time_format = (!options.time.disabled).then(|| options.time.format.clone());
        let pipeline = Pipeline::from_sinks(options, sinks, |_| {
            Box::new(JsonFormatter::new(time_format.clone()).with_message_key(JSON_MESSAGE_KEY))
                as Box<dyn Formatter>
        });
        Self {
            engine: Arc::new(JsonEngine {
                pipeline,
                error_field_name: options.effective_error_field_name().to_string(),
            }),
            fields: Fields::new(),
        }
    }

    /// Fields a JSON logger stored in `ctx`.
    #[must_use]
    pub fn fields_in_context(ctx: &LogContext) -> Fields {
        ctx.get::<JsonContextKey>()
            .map(|handle| handle.fields.clone())
            .unwrap_or_default()
    }
}

impl Logger for JsonLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.engine.pipeline.log(level, args, &self.fields);
    }

    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args);
        terminate::exit_fatal(&self.engine.pipeline.output())
    }

    fn panic(&self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        self.engine
            .pipeline
            .emit(LogLevel::Panic, &message, &self.fields);
        terminate::unwind(&self.engine.pipeline.output(), message)
    }

    fn with_fields(&self, fields: &Fields) -> SharedLogger {
        Arc::new(Self {
            engine: Arc::clone(&self.engine),
            fields: self.fields.merge(fields),
        })
    }

    fn to_context(&self, ctx: &LogContext) -> LogContext {
        let fields = Self::fields_in_context(ctx).merge(&self.fields);
        ctx.with_value::<JsonContextKey>(JsonHandle {
            engine: Arc::clone(&self.engine),
            fields,
        })
    }

    fn from_context(&self, ctx: &LogContext) -> SharedLogger {
        match ctx.get::<JsonContextKey>() {
            Some(handle) if handle.engine.pipeline.is_enabled() => Arc::new(Self {
                engine: Arc::clone(&handle.engine),
                fields: handle.fields.clone(),
            }),
            _ => Arc::new(self.clone()),
        }
    }

    fn fields(&self) -> Fields {
        self.fields.clone()
    }

    fn output(&self) -> SharedSink {
        self.engine.pipeline.output()
    }

    fn error_field_name(&self) -> &str {
        &self.engine.error_field_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logport_testkit::MemorySink;
    use serde_json::{Value, json};
    use std::error::Error;

    fn logger_with(options: &LoggerOptions) -> (JsonLogger, Arc<MemorySink>) {
        let sink = MemorySink::shared();
        let logger = JsonLogger::with_sinks(options, SinkSet::empty().with_console(sink.clone()));
        (logger, sink)
    }

    fn untimed() -> LoggerOptions {
        LoggerOptions::default().with_time_disabled(true)
    }

    fn parse_lines(sink: &MemorySink) -> Result<Vec<Value>, Box<dyn Error>> {
        sink.take()
            .iter()
            .map(|line| serde_json::from_str(line.trim_end()).map_err(Into::into))
            .collect()
    }

    #[test]
    fn emits_one_object_per_line() -> Result<(), Box<dyn Error>> {
        let (root, sink) = logger_with(&untimed());
        root.with_field("user", json!("ada"))
            .warn(format_args!("quota {}%", 90));

        assert_eq!(
            parse_lines(&sink)?,
            [json!({"user": "ada", "level": "warning", "message": "quota 90%"})]
        );
        Ok(())
    }

    #[test]
    fn timestamp_uses_configured_format() -> Result<(), Box<dyn Error>> {
        let (root, sink) = logger_with(&LoggerOptions::default().with_time_format("%Y"));
        root.info(format_args!("stamped"));

        let lines = parse_lines(&sink)?;
        let time = lines
            .first()
            .and_then(|line| line["time"].as_str())
            .ok_or_else(|| std::io::Error::other("missing time"))?;
        assert_eq!(time.len(), 4);
        Ok(())
    }

    #[test]
    fn context_handle_rebuilds_pushed_logger() -> Result<(), Box<dyn Error>> {
        let (root, sink) = logger_with(&untimed());
        let global = root.with_field("main_field", json!("example"));
        let ctx = global.to_context(&LogContext::background());

        let foo = global.from_context(&ctx).with_field("foo_field", json!("example"));
        let ctx = foo.to_context(&ctx);
        global
            .from_context(&ctx)
            .with_field("bar_field", json!("example"))
            .info(format_args!("bar method."));

        assert_eq!(
            parse_lines(&sink)?,
            [json!({
                "bar_field": "example",
                "foo_field": "example",
                "main_field": "example",
                "level": "info",
                "message": "bar method."
            })]
        );
        Ok(())
    }

    #[test]
    fn missing_handle_falls_back_to_receiver() {
        let (root, _sink) = logger_with(&untimed());
        let receiver = root.with_field("ID", json!("1"));

        let rebuilt = receiver.from_context(&LogContext::background());

        assert_eq!(rebuilt.fields(), receiver.fields());
    }

    #[test]
    fn disabled_engine_falls_back_to_receiver() {
        let disabled = JsonLogger::with_sinks(&untimed(), SinkSet::empty())
            .with_field("from", json!("disabled"));
        let ctx = disabled.to_context(&LogContext::background());
        let (root, sink) = logger_with(&untimed());

        root.from_context(&ctx).info(format_args!("kept"));

        assert_eq!(sink.take().len(), 1);
        assert_eq!(JsonLogger::fields_in_context(&ctx).get("from"), Some(&json!("disabled")));
    }

    #[test]
    fn file_level_is_independent() -> Result<(), Box<dyn Error>> {
        let console = MemorySink::shared();
        let file = MemorySink::shared();
        let options = untimed()
            .with_console_level(LogLevel::Trace)
            .with_file_level(LogLevel::Error);
        let root = JsonLogger::with_sinks(
            &options,
            SinkSet::empty().with_console(console.clone()).with_file(file.clone()),
        );

        root.trace(format_args!("fine"));
        root.error(format_args!("bad"));

        assert_eq!(parse_lines(&console)?.len(), 2);
        assert_eq!(parse_lines(&file)?, [json!({"level": "error", "message": "bad"})]);
        Ok(())
    }
}
