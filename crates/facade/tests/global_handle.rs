//! Integration tests for the process-wide logger handle.
//!
//! Tests share one global, so each takes `SERIAL` first and resets it.

use logport_facade::{
    LogContext, Logger, LoggerOptions, NoopLogger, SharedLogger, SinkSet, TextLogger,
    global_logger, set_global_logger,
};
use logport_testkit::{MemorySink, RecordingLogger};
use parking_lot::{Mutex, MutexGuard};
use serde_json::json;
use std::error::Error;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

static SERIAL: Mutex<()> = Mutex::new(());

fn exclusive() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock();
    set_global_logger(NoopLogger::shared());
    guard
}

fn install_text(sink: &Arc<MemorySink>) {
    let options = LoggerOptions::default().with_time_disabled(true);
    let logger = TextLogger::with_sinks(&options, SinkSet::empty().with_console(sink.clone()));
    set_global_logger(logger.with_field("main_field", json!("example")));
}

#[test]
fn global_defaults_to_noop() {
    let _guard = exclusive();

    logport_facade::global::info(format_args!("dropped"));
    logport_facade::global::fatal(format_args!("dropped"));
    logport_facade::global::panic(format_args!("dropped"));

    assert!(logport_facade::global::fields().is_empty());
    let derived = logport_facade::global::with_field("ID", "1");
    assert!(derived.fields().is_empty());
}

#[test]
fn free_functions_and_macros_delegate_to_installed_logger() {
    let _guard = exclusive();
    let recording = RecordingLogger::new();
    set_global_logger(Arc::new(recording.clone()));

    logport_facade::info!("{} method.", "main");
    logport_facade::warn!("plain");
    logport_facade::global::printf(format_args!("printed"));
    logport_facade::global::debug(format_args!("dbg"));

    assert_eq!(
        recording.messages(),
        ["main method.", "plain", "printed", "dbg"]
    );
}

#[test]
fn with_field_on_global_returns_new_logger() {
    let _guard = exclusive();
    set_global_logger(Arc::new(RecordingLogger::new()));

    let derived = logport_facade::global::with_field("ID", "1");

    assert_eq!(derived.fields().get("ID"), Some(&json!("1")));
    assert!(global_logger().fields().is_empty());
}

#[test]
fn last_writer_wins() {
    let _guard = exclusive();
    let first = RecordingLogger::new();
    let second = RecordingLogger::new();

    set_global_logger(Arc::new(first.clone()));
    set_global_logger(Arc::new(second.clone()));
    logport_facade::error!("to second");

    assert!(first.messages().is_empty());
    assert_eq!(second.messages(), ["to second"]);
}

#[test]
fn context_flow_through_global() {
    let _guard = exclusive();
    let sink = MemorySink::shared();
    install_text(&sink);

    let ctx = logport_facade::global::to_context(&LogContext::background());
    let foo: SharedLogger =
        logport_facade::global::from_context(&ctx).with_field("foo_field", json!("example"));
    foo.info(format_args!("foo method."));
    let ctx = foo.to_context(&ctx);

    logport_facade::global::from_context(&ctx)
        .with_field("bar_field", json!("example"))
        .info(format_args!("bar method."));
    logport_facade::info!("withoutContext method");

    assert_eq!(
        sink.take(),
        [
            "level=info msg=\"foo method.\" foo_field=example main_field=example\n",
            "level=info msg=\"bar method.\" bar_field=example foo_field=example main_field=example\n",
            "level=info msg=\"withoutContext method\" main_field=example\n",
        ]
    );
}

#[test]
fn handle_survives_panic_through_global() -> Result<(), Box<dyn Error>> {
    let _guard = exclusive();
    let sink = MemorySink::shared();
    install_text(&sink);

    let unwound = catch_unwind(AssertUnwindSafe(|| logport_facade::panic!("bad {}", 1)));
    assert!(unwound.is_err());

    logport_facade::info!("still usable");
    let lines = sink.take();
    let last = lines.last().ok_or_else(|| std::io::Error::other("no lines"))?;
    assert_eq!(
        lines.first().map(String::as_str),
        Some("level=panic msg=\"bad 1\" main_field=example\n")
    );
    assert_eq!(last, "level=info msg=\"still usable\" main_field=example\n");
    Ok(())
}

#[test]
fn build_logger_installs_when_requested() {
    let _guard = exclusive();
    let options = LoggerOptions::default()
        .with_console_enabled(false)
        .with_install_global(true);

    let built = logport_facade::build_logger(&options);

    assert!(Arc::ptr_eq(&built, &global_logger()));
}
