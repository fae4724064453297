//! Logger rendering text, JSON or CloudWatch lines through the in-crate
//! formatter pipeline.

use crate::format::formatter_for;
use crate::pipeline::Pipeline;
use crate::sink::SinkSet;
use crate::terminate;
use logport_config::LoggerOptions;
use logport_ports::{
    ContextKey, Fields, LogContext, LogLevel, Logger, SharedLogger, SharedSink,
    fields_from_context, to_context,
};
use logport_shared::{ErrorEnvelope, Result};
use std::fmt;
use std::sync::Arc;

struct TextContextKey;

impl ContextKey for TextContextKey {
    type Value = Fields;
}

#[derive(Debug)]
struct TextEngine {
    pipeline: Pipeline,
    error_field_name: String,
}

/// Text-engine logger. Each sink has its own level and line format.
///
/// Derived loggers share the engine and own their fields.
#[derive(Debug, Clone)]
pub struct TextLogger {
    engine: Arc<TextEngine>,
    fields: Fields,
}

impl TextLogger {
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

    /// Build over caller-provided sinks; levels and formats come from `options`.
    #[must_use]
    pub fn with_sinks(options: &LoggerOptions, sinks: SinkSet) -> Self {
        let pipeline = Pipeline::from_sinks(options, sinks, |format| {
            formatter_for(format, &options.time, &options.cloudwatch)
        });
        Self {
            engine: Arc::new(TextEngine {
                pipeline,
                error_field_name: options.effective_error_field_name().to_string(),
            }),
            fields: Fields::new(),
        }
    }

    /// Fields a text logger stored in `ctx`.
    #[must_use]
    pub fn fields_in_context(ctx: &LogContext) -> Fields {
        fields_from_context::<TextContextKey>(Some(ctx))
    }

    fn derive(&self, fields: Fields) -> SharedLogger {
        Arc::new(Self {
            engine: Arc::clone(&self.engine),
            fields,
        })
    }
}

impl Logger for TextLogger {
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
        self.derive(self.fields.merge(fields))
    }

    fn to_context(&self, ctx: &LogContext) -> LogContext {
        to_context::<TextContextKey>(ctx, &self.fields)
    }

    fn from_context(&self, ctx: &LogContext) -> SharedLogger {
        self.with_fields(&Self::fields_in_context(ctx))
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
