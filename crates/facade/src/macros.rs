//! Formatting macros.
//!
//! `trace!` through `panic!` log through the global handle;
//! `log_trace!` through `log_panic!` take an explicit logger first.
//!
//! ```
//! use logport_facade::NoopLogger;
//!
//! logport_facade::info!("{} method.", "main");
//! let logger = NoopLogger;
//! logport_facade::log_info!(logger, "{} method.", "foo");
//! ```

/// Trace record through the global logger.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::global::trace(::core::format_args!($($arg)+))
    };
}

/// Debug record through the global logger.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::global::debug(::core::format_args!($($arg)+))
    };
}

/// Info record through the global logger.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::global::info(::core::format_args!($($arg)+))
    };
}

/// Warn record through the global logger.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::global::warn(::core::format_args!($($arg)+))
    };
}

/// Error record through the global logger.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::global::error(::core::format_args!($($arg)+))
    };
}

/// Fatal record through the global logger.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {
        $crate::global::fatal(::core::format_args!($($arg)+))
    };
}

/// Panic record through the global logger.
#[macro_export]
macro_rules! panic {
    ($($arg:tt)+) => {
        $crate::global::panic(::core::format_args!($($arg)+))
    };
}

/// Trace record through `logger`.
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.trace(::core::format_args!($($arg)+))
    }};
}

/// Debug record through `logger`.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.debug(::core::format_args!($($arg)+))
    }};
}

/// Info record through `logger`.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.info(::core::format_args!($($arg)+))
    }};
}

/// Warn record through `logger`.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.warn(::core::format_args!($($arg)+))
    }};
}

/// Error record through `logger`.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.error(::core::format_args!($($arg)+))
    }};
}

/// Fatal record through `logger`.
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.fatal(::core::format_args!($($arg)+))
    }};
}

/// Panic record through `logger`.
#[macro_export]
macro_rules! log_panic {
    ($logger:expr, $($arg:tt)+) => {{
        use $crate::Logger as _;
        $logger.panic(::core::format_args!($($arg)+))
    }};
}
