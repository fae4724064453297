//! Log sinks: console streams, discard, fan-out, and `io::Write` bridges.

use crate::rolling::{RollingConfig, RollingFileSink, SinkError};
use logport_config::{ConsoleStream, LoggerOptions};
use logport_ports::{LogSink, SharedSink};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::MakeWriter;

/// Reports the first write failure of a sink to stderr, then stays quiet.
#[derive(Debug, Default)]
pub(crate) struct FailureLatch {
    reported: AtomicBool,
}

impl FailureLatch {
    pub(crate) fn report(&self, sink: &str, error: &io::Error) {
        if !self.reported.swap(true, Ordering::Relaxed) {
            eprintln!("logport: {sink} sink write failed: {error}");
        }
    }
}

/// Log sink that writes to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink {
    failure: FailureLatch,
}

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(error) = stdout.write_all(line.as_bytes()) {
            self.failure.report("stdout", &error);
        }
    }

    fn flush(&self) {
        if let Err(error) = io::stdout().lock().flush() {
            self.failure.report("stdout", &error);
        }
    }
}

/// Log sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrSink {
    failure: FailureLatch,
}

impl LogSink for StderrSink {
    fn write_line(&self, line: &str) {
        let mut stderr = io::stderr().lock();
        if let Err(error) = stderr.write_all(line.as_bytes()) {
            self.failure.report("stderr", &error);
        }
    }

    fn flush(&self) {
        if let Err(error) = io::stderr().lock().flush() {
            self.failure.report("stderr", &error);
        }
    }
}

/// Sink that drops every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl LogSink for DiscardSink {
    fn write_line(&self, _line: &str) {}
}

/// Shared discard sink.
#[must_use]
pub fn discard() -> SharedSink {
    Arc::new(DiscardSink)
}

/// Writes every line to each inner sink, in order.
#[derive(Debug, Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<SharedSink>,
}

impl FanoutSink {
    /// Fan out over `sinks`.
    #[must_use]
    pub const fn new(sinks: Vec<SharedSink>) -> Self {
        Self { sinks }
    }

    /// Collapse to the cheapest equivalent sink: discard for none, the sink
    /// itself for one, a fan-out otherwise.
    #[must_use]
    pub fn shared(mut sinks: Vec<SharedSink>) -> SharedSink {
        match sinks.len() {
            0 => discard(),
            1 => sinks.remove(0),
            _ => Arc::new(Self::new(sinks)),
        }
    }

    /// Number of inner sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns true when there is no inner sink.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LogSink for FanoutSink {
    fn write_line(&self, line: &str) {
        for sink in &self.sinks {
            sink.write_line(line);
        }
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

/// Console stream sink for `stream`.
#[must_use]
pub fn console(stream: ConsoleStream) -> SharedSink {
    match stream {
        ConsoleStream::Stdout => Arc::new(StdoutSink::default()),
        ConsoleStream::Stderr => Arc::new(StderrSink::default()),
    }
}

/// The console and file sinks a logger writes to.
///
/// A disabled destination is `None`.
#[derive(Debug, Clone, Default)]
pub struct SinkSet {
    /// Console sink.
    pub console: Option<SharedSink>,
    /// File sink.
    pub file: Option<SharedSink>,
}

impl SinkSet {
    /// No sinks.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            console: None,
            file: None,
        }
    }

    /// Replace the console sink.
    #[must_use]
    pub fn with_console(mut self, sink: SharedSink) -> Self {
        self.console = Some(sink);
        self
    }

    /// Replace the file sink.
    #[must_use]
    pub fn with_file(mut self, sink: SharedSink) -> Self {
        self.file = Some(sink);
        self
    }

    /// Open the sinks enabled in `options`.
    ///
    /// # Errors
    /// Returns [`SinkError::Open`] when the log file cannot be opened.
    pub fn open(options: &LoggerOptions) -> Result<Self, SinkError> {
        let mut set = Self::empty();
        if options.console.enabled {
            set.console = Some(console(options.console.stream));
        }
        if options.file.enabled {
            let config = RollingConfig::from_file_options(&options.file);
            set.file = Some(Arc::new(RollingFileSink::open(config)?));
        }
        Ok(set)
    }

    /// Like [`SinkSet::open`], but a file that cannot be opened is replaced
    /// by a discard sink.
    #[must_use]
    pub fn open_lossy(options: &LoggerOptions) -> Self {
        let mut set = Self::empty();
        if options.console.enabled {
            set.console = Some(console(options.console.stream));
        }
        if options.file.enabled {
            let config = RollingConfig::from_file_options(&options.file);
            let file: SharedSink = match RollingFileSink::open(config) {
                Ok(sink) => Arc::new(sink),
                Err(error) => {
                    tracing::warn!(%error, "log file unavailable, discarding file output");
                    discard()
                },
            };
            set.file = Some(file);
        }
        set
    }

    /// Returns true when neither sink is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.console.is_none() && self.file.is_none()
    }
}

/// `io::Write` adapter over a sink.
///
/// Bytes are buffered and handed to the sink as one line when the writer is
/// flushed or dropped.
#[derive(Debug)]
pub struct SinkWriter {
    sink: SharedSink,
    buffer: Vec<u8>,
}

impl SinkWriter {
    /// Wrap a sink.
    #[must_use]
    pub const fn new(sink: SharedSink) -> Self {
        Self {
            sink,
            buffer: Vec::new(),
        }
    }

    fn forward(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buffer);
        self.sink.write_line(&text);
        self.buffer.clear();
    }
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.forward();
        self.sink.flush();
        Ok(())
    }
}

impl Drop for SinkWriter {
    fn drop(&mut self) {
        self.forward();
    }
}

/// `MakeWriter` for `tracing-subscriber` fmt layers writing into a sink.
#[derive(Debug, Clone)]
pub struct SinkMakeWriter {
    sink: SharedSink,
}

impl SinkMakeWriter {
    /// Wrap a sink.
    #[must_use]
    pub const fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl<'a> MakeWriter<'a> for SinkMakeWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter::new(Arc::clone(&self.sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logport_testkit::MemorySink;

    #[test]
    fn fanout_writes_to_every_sink() {
        let first = Arc::new(MemorySink::default());
        let second = Arc::new(MemorySink::default());
        let fanout = FanoutSink::shared(vec![first.clone(), second.clone()]);

        fanout.write_line("hello\n");

        assert_eq!(first.lines(), ["hello\n"]);
        assert_eq!(second.lines(), ["hello\n"]);
    }

    #[test]
    fn fanout_of_one_is_the_sink_itself() {
        let only = Arc::new(MemorySink::default());
        let shared = FanoutSink::shared(vec![only.clone()]);
        shared.write_line("x\n");
        assert_eq!(only.take(), ["x\n"]);
    }

    #[test]
    fn sink_set_skips_disabled_destinations() -> Result<(), SinkError> {
        let options = LoggerOptions::default().with_console_enabled(false);
        let set = SinkSet::open(&options)?;
        assert!(set.is_empty());
        Ok(())
    }

    #[test]
    fn sink_set_opens_file_sink() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let options = LoggerOptions::default()
            .with_console_enabled(false)
            .with_file_enabled(true)
            .with_file_path(dir.path().display().to_string())
            .with_file_name("svc.log");

        let set = SinkSet::open(&options)?;
        let file = set.file.ok_or_else(|| io::Error::other("missing file sink"))?;
        file.write_line("hello\n");
        file.flush();

        assert_eq!(std::fs::read_to_string(dir.path().join("svc.log"))?, "hello\n");
        Ok(())
    }

    #[test]
    fn lossy_open_discards_unopenable_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "")?;
        let options = LoggerOptions::default()
            .with_console_enabled(false)
            .with_file_enabled(true)
            .with_file_path(blocker.join("nested").display().to_string());

        assert!(SinkSet::open(&options).is_err());
        let set = SinkSet::open_lossy(&options);
        assert!(set.file.is_some());
        Ok(())
    }

    #[test]
    fn sink_writer_forwards_on_drop() -> io::Result<()> {
        let memory = Arc::new(MemorySink::default());
        {
            let mut writer = SinkWriter::new(memory.clone());
            writer.write_all(b"level=info ")?;
            writer.write_all(b"msg=done\n")?;
            assert!(memory.lines().is_empty());
        }
        assert_eq!(memory.take(), ["level=info msg=done\n"]);
        Ok(())
    }

    #[test]
    fn make_writer_produces_independent_writers() -> io::Result<()> {
        let memory = Arc::new(MemorySink::default());
        let make = SinkMakeWriter::new(memory.clone());

        let mut writer = make.make_writer();
        writer.write_all(b"one\n")?;
        writer.flush()?;
        drop(writer);

        assert_eq!(memory.take(), ["one\n"]);
        Ok(())
    }
}
