// SPDX-License-Identifier: MIT OR Apache-2.0

//! The formatted log entry and the call-site location it refers to.
//!
//! A [`LogRecord`] is produced by the formatter for each log call that passes the
//! level filter. It is owned by the call until the dispatcher takes it, after which
//! it lives as a tracked buffer until the write that consumes it finishes.
//!
//! ```rust
//! use logwire::{LogRecord, Level};
//!
//! let mut record = LogRecord::new(Level::Info);
//! record.log("Processing request ");
//! record.log_fmt(format_args!("#{}", 42));
//! assert_eq!(record.as_str(), "Processing request #42");
//! ```

use crate::Level;
use std::collections::TryReserveError;
use std::fmt::{Arguments, Display, Write};

/// The source location of a log call.
///
/// The logging macros fill this in with `file!()`, `line!()` and `column!()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.file, self.line, self.column)
    }
}

/**
A formatted log entry.

The text is accumulated progressively by the formatter and is complete, including
its trailing newline, by the time the record is handed to the dispatcher.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogRecord {
    text: String,
    level: Level,
}

impl LogRecord {
    pub fn new(level: Level) -> Self {
        Self {
            text: String::new(),
            level,
        }
    }

    /**
    Reserves room for at least `additional` more bytes without aborting on failure.
    */
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.text.try_reserve(additional)
    }

    /// Append the message to the record.
    pub fn log(&mut self, message: &str) {
        self.text.push_str(message);
    }

    /// Append preformatted arguments to the record.
    pub fn log_fmt(&mut self, args: Arguments<'_>) {
        //writing into a String cannot fail
        let _ = self.text.write_fmt(args);
    }

    /// Like [`Self::log`], but reports allocation failure instead of aborting.
    pub fn try_log(&mut self, message: &str) -> Result<(), TryReserveError> {
        self.text.try_reserve(message.len())?;
        self.text.push_str(message);
        Ok(())
    }

    /**
    Like [`Self::log_fmt`], but every piece is appended with a fallible reservation.

    On allocation failure the record keeps whatever was appended before the failing
    piece.
    */
    pub fn try_log_fmt(&mut self, args: Arguments<'_>) -> Result<(), TryReserveError> {
        let mut out = Fallible {
            text: &mut self.text,
            failed: None,
        };
        //a Display impl reporting an error leaves a truncated piece, as with log_fmt
        let _ = out.write_fmt(args);
        match out.failed {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

struct Fallible<'a> {
    text: &'a mut String,
    failed: Option<TryReserveError>,
}

impl Write for Fallible<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        match self.text.try_reserve(s.len()) {
            Ok(()) => {
                self.text.push_str(s);
                Ok(())
            }
            Err(e) => {
                self.failed = Some(e);
                Err(std::fmt::Error)
            }
        }
    }
}

impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn fallible_appends_render_arguments() {
        let mut record = LogRecord::new(Level::Warn);
        record.try_log("retry ").unwrap();
        let attempt = 3;
        record
            .try_log_fmt(format_args!("{attempt} of {}", 5))
            .unwrap();
        assert_eq!(record.as_str(), "retry 3 of 5");
        assert_eq!(record.len(), 12);
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn fallible_append_within_reservation_keeps_allocation() {
        let mut record = LogRecord::new(Level::Info);
        record.try_reserve(64).unwrap();
        let before = record.as_str().as_ptr();
        record.try_log_fmt(format_args!("{}-{}", "a", 1)).unwrap();
        assert_eq!(record.as_str().as_ptr(), before);
    }
}
