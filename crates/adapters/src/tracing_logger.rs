//! Logger backed by `tracing` events and `tracing-subscriber` fmt layers.
//!
//! Each logger owns a private [`Dispatch`] (a registry with one fmt layer
//! per sink) and scopes it around every event, so the process-wide
//! subscriber never sees these records. Attached fields travel as a single
//! `fields` value holding their JSON encoding.

use crate::sink::{FanoutSink, SinkMakeWriter, SinkSet};
use crate::terminate;
use logport_config::{LogFormat, LoggerOptions, TimeOptions};
use logport_ports::{
    ContextKey, Fields, LogContext, LogLevel, Logger, SharedLogger, SharedSink,
    fields_from_context, to_context,
};
use logport_shared::{ErrorEnvelope, Result};
use std::fmt;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Target attached to every event.
pub const EVENT_TARGET: &str = "logport";

type SinkLayer = Box<dyn Layer<Registry> + Send + Sync>;

struct TracingContextKey;

impl ContextKey for TracingContextKey {
    type Value = Fields;
}

#[derive(Debug)]
struct TracingEngine {
    dispatch: Dispatch,
    output: SharedSink,
    levels: Vec<LogLevel>,
    error_field_name: String,
}

/// `tracing`-engine logger.
///
/// PANIC and FATAL records are emitted as `ERROR` events; `tracing` has no
/// higher level.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    engine: Arc<TracingEngine>,
    fields: Fields,
}

impl TracingLogger {
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
        let mut layers: Vec<SinkLayer> = Vec::new();
        let mut outputs = Vec::new();
        let mut levels = Vec::new();
        let destinations = [
            (sinks.console, options.console.level, options.console.format),
            (sinks.file, options.file.level, options.file.format),
        ];
        for (sink, level, format) in destinations {
            if let Some(sink) = sink {
                layers.push(sink_layer(Arc::clone(&sink), level, format, &options.time));
                outputs.push(sink);
                levels.push(level);
            }
        }

        let dispatch = Dispatch::new(Registry::default().with(layers));
        Self {
            engine: Arc::new(TracingEngine {
                dispatch,
                output: FanoutSink::shared(outputs),
                levels,
                error_field_name: options.effective_error_field_name().to_string(),
            }),
            fields: Fields::new(),
        }
    }

    /// Fields a tracing logger stored in `ctx`.
    #[must_use]
    pub fn fields_in_context(ctx: &LogContext) -> Fields {
        fields_from_context::<TracingContextKey>(Some(ctx))
    }

    fn accepts(&self, level: LogLevel) -> bool {
        self.engine.levels.iter().any(|min| level.passes(*min))
    }

    fn emit(&self, level: LogLevel, message: &str) {
        let encoded = (!self.fields.is_empty())
            .then(|| serde_json::to_string(&self.fields).unwrap_or_default());
        tracing::dispatcher::with_default(&self.engine.dispatch, || {
            emit_event(level, message, encoded.as_deref());
        });
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.accepts(level) {
            self.emit(level, &args.to_string());
        }
    }

    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args);
        terminate::exit_fatal(&self.engine.output)
    }

    fn panic(&self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        if self.accepts(LogLevel::Panic) {
            self.emit(LogLevel::Panic, &message);
        }
        terminate::unwind(&self.engine.output, message)
    }

    fn with_fields(&self, fields: &Fields) -> SharedLogger {
        Arc::new(Self {
            engine: Arc::clone(&self.engine),
            fields: self.fields.merge(fields),
        })
    }

    fn to_context(&self, ctx: &LogContext) -> LogContext {
        to_context::<TracingContextKey>(ctx, &self.fields)
    }

    fn from_context(&self, ctx: &LogContext) -> SharedLogger {
        self.with_fields(&Self::fields_in_context(ctx))
    }

    fn fields(&self) -> Fields {
        self.fields.clone()
    }

    fn output(&self) -> SharedSink {
        Arc::clone(&self.engine.output)
    }

    fn error_field_name(&self) -> &str {
        &self.engine.error_field_name
    }
}

/// `tracing` threshold for a sink level.
const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error | LogLevel::Panic | LogLevel::Fatal => LevelFilter::ERROR,
    }
}

fn sink_layer(
    sink: SharedSink,
    level: LogLevel,
    format: LogFormat,
    time: &TimeOptions,
) -> SinkLayer {
    let filter = level_filter(level);
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(SinkMakeWriter::new(sink));
    let timer = ChronoLocal::new(time.format.clone());
    match (format, time.disabled) {
        (LogFormat::Json, true) => layer.json().without_time().with_filter(filter).boxed(),
        (LogFormat::Json, false) => layer.json().with_timer(timer).with_filter(filter).boxed(),
        (LogFormat::Text | LogFormat::CloudWatch, true) => {
            layer.without_time().with_filter(filter).boxed()
        },
        (LogFormat::Text | LogFormat::CloudWatch, false) => {
            layer.with_timer(timer).with_filter(filter).boxed()
        },
    }
}

macro_rules! event_at {
    ($level:expr, $message:expr, $fields:expr) => {
        match $fields {
            Some(fields) => {
                tracing::event!(target: EVENT_TARGET, $level, fields = %fields, "{}", $message);
            },
            None => tracing::event!(target: EVENT_TARGET, $level, "{}", $message),
        }
    };
}

fn emit_event(level: LogLevel, message: &str, fields: Option<&str>) {
    match level {
        LogLevel::Trace => event_at!(tracing::Level::TRACE, message, fields),
        LogLevel::Debug => event_at!(tracing::Level::DEBUG, message, fields),
        LogLevel::Info => event_at!(tracing::Level::INFO, message, fields),
        LogLevel::Warn => event_at!(tracing::Level::WARN, message, fields),
        LogLevel::Error | LogLevel::Panic | LogLevel::Fatal => {
            event_at!(tracing::Level::ERROR, message, fields);
        },
    }
}
