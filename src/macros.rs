// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site logging macros.
//!
//! Each severity has a macro taking a logger, an optional context slice, and a
//! `format!`-style template with its arguments:
//!
//! ```rust
//! use logwire::ContextEntry;
//! # use logwire::{Config, Logger};
//! # let logger = Logger::open(Config::new().levels(["INFO", "ERROR"]).test_mode(true)).unwrap();
//! let ctx = [ContextEntry::new("job", "42")];
//!
//! logwire::info!(logger, "started {} workers", 4);
//! logwire::err!(logger, ctx: ctx, "job failed after {secs}s", secs = 3);
//! ```
//!
//! The macros capture `file!()`, `line!()` and `column!()` for the entry header, and
//! check the level before touching the template: arguments of a disabled level are
//! never evaluated and nothing is formatted or allocated.
//!
//! The logger argument may be a `Logger`, a `&Logger` or an `Arc<Logger>`.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($logger:expr, $level:expr, $ctx:expr, $($arg:tt)+) => {{
        let logger: &$crate::Logger = &$logger;
        if logger.enabled($level) {
            logger.log(
                $level,
                ::std::format_args!($($arg)+),
                $ctx,
                $crate::CallSite::new(::std::file!(), ::std::line!(), ::std::column!()),
            );
        }
    }};
}

/// Logs at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($logger:expr, ctx: $ctx:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Debug, ::std::option::Option::Some(&$ctx[..]), $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Debug, ::std::option::Option::None, $($arg)+)
    };
}

/// Logs at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    ($logger:expr, ctx: $ctx:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Info, ::std::option::Option::Some(&$ctx[..]), $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Info, ::std::option::Option::None, $($arg)+)
    };
}

/// Logs at [`Level::Warn`](crate::Level::Warn).
#[macro_export]
macro_rules! warn {
    ($logger:expr, ctx: $ctx:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Warn, ::std::option::Option::Some(&$ctx[..]), $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Warn, ::std::option::Option::None, $($arg)+)
    };
}

/// Logs at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! err {
    ($logger:expr, ctx: $ctx:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Error, ::std::option::Option::Some(&$ctx[..]), $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Error, ::std::option::Option::None, $($arg)+)
    };
}

/// Logs at [`Level::Fatal`](crate::Level::Fatal).
///
/// Fatal entries are written synchronously and echoed to the console even when the
/// logger writes to a file. The macro does not exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, ctx: $ctx:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Fatal, ::std::option::Option::Some(&$ctx[..]), $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::__log_at!($logger, $crate::Level::Fatal, ::std::option::Option::None, $($arg)+)
    };
}

/// Returns whether `logger` writes entries at `level`.
///
/// ```
/// # use logwire::{Config, Level, Logger};
/// let logger = Logger::open(Config::new().levels(["ERROR"])).unwrap();
/// assert!(logwire::log_enabled!(logger, Level::Error));
/// assert!(!logwire::log_enabled!(logger, Level::Info));
/// ```
#[macro_export]
macro_rules! log_enabled {
    ($logger:expr, $level:expr) => {{
        let logger: &$crate::Logger = &$logger;
        logger.enabled($level)
    }};
}
