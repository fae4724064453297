//! Process termination behind `fatal` and `panic`.

use logport_ports::SharedSink;

/// Exit status used by `fatal`.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Flush `output` and exit the process with [`FATAL_EXIT_CODE`].
pub(crate) fn exit_fatal(output: &SharedSink) -> ! {
    output.flush();
    std::process::exit(FATAL_EXIT_CODE)
}

/// Flush `output` and unwind with `message` as the `String` payload.
pub(crate) fn unwind(output: &SharedSink, message: String) -> ! {
    output.flush();
    std::panic::panic_any(message)
}
