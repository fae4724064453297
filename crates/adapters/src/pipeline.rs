//! Per-sink level filtering and formatting shared by the text and JSON
//! loggers.

use crate::format::{Formatter, Record};
use crate::sink::{FanoutSink, SinkSet};
use chrono::Local;
use logport_config::{LogFormat, LoggerOptions};
use logport_ports::{Fields, LogLevel, SharedSink};
use std::fmt;
use std::sync::Arc;

/// One destination with its own threshold and line format.
#[derive(Debug)]
pub(crate) struct SinkTarget {
    sink: SharedSink,
    level: LogLevel,
    formatter: Box<dyn Formatter>,
}

/// Ordered set of sink targets plus the fan-out reported by `output()`.
#[derive(Debug)]
pub(crate) struct Pipeline {
    targets: Vec<SinkTarget>,
    output: SharedSink,
}

impl Pipeline {
    /// Console first, then file, each formatted by `make_formatter(format)`.
    pub(crate) fn from_sinks<F>(
        options: &LoggerOptions,
        sinks: SinkSet,
        make_formatter: F,
    ) -> Self
    where
        F: Fn(LogFormat) -> Box<dyn Formatter>,
    {
        let mut targets = Vec::new();
        if let Some(sink) = sinks.console {
            targets.push(SinkTarget {
                sink,
                level: options.console.level,
                formatter: make_formatter(options.console.format),
            });
        }
        if let Some(sink) = sinks.file {
            targets.push(SinkTarget {
                sink,
                level: options.file.level,
                formatter: make_formatter(options.file.format),
            });
        }
        let output = FanoutSink::shared(
            targets
                .iter()
                .map(|target| Arc::clone(&target.sink))
                .collect(),
        );
        Self { targets, output }
    }

    /// Returns true when at least one sink is configured.
    pub(crate) fn is_enabled(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Returns true when some sink accepts `level`.
    pub(crate) fn accepts(&self, level: LogLevel) -> bool {
        self.targets.iter().any(|target| level.passes(target.level))
    }

    /// Render and write one record to every sink that accepts `level`.
    pub(crate) fn emit(&self, level: LogLevel, message: &str, fields: &Fields) {
        let record = Record {
            time: Local::now(),
            level,
            message,
            fields,
        };
        for target in &self.targets {
            if level.passes(target.level) {
                target.sink.write_line(&target.formatter.format(&record));
            }
        }
    }

    /// Render `args` and emit, skipping the rendering when no sink accepts.
    pub(crate) fn log(&self, level: LogLevel, args: fmt::Arguments<'_>, fields: &Fields) {
        if self.accepts(level) {
            self.emit(level, &args.to_string(), fields);
        }
    }

    pub(crate) fn output(&self) -> SharedSink {
        Arc::clone(&self.output)
    }
}
