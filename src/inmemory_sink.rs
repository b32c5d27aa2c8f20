// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! A console sink that keeps every entry in memory instead of printing it. It is
//! meant for tests that need to observe exactly what reached the console:
//!
//! - verifying that a FATAL entry was echoed to the console
//! - verifying that a disabled level produced no output at all
//! - capturing output where stdout is redirected or unavailable
//!
//! Entries are stored in a `Mutex<Vec<String>>`, so a sink shared through `Arc` can be
//! written from completion callbacks on other threads.

use crate::sink::Sink;
use std::io;
use std::sync::Mutex;

/// A console sink that stores entries in a `Vec<String>`.
///
/// # Example
///
/// ```rust
/// use logwire::{Config, InMemorySink, Logger};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::open(
///     Config::new().levels(["INFO"]).console_sink(sink.clone()),
/// ).unwrap();
///
/// logwire::info!(logger, "Test message {value}", value = 42);
///
/// let logs = sink.drain_logs();
/// assert!(logs.contains("~Test message 42"));
/// ```
#[derive(Debug)]
pub struct InMemorySink {
    logs: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug: derived, required by Sink
// - Default: empty buffer
// - Clone: NOT implemented, sinks are shared through Arc
// - PartialEq/Eq/Hash: NOT implemented, comparing mutex state is problematic
// - Send/Sync: automatic through Mutex

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
        }
    }

    /// Drains all entries into a single string, clearing the internal buffer.
    ///
    /// Entries already end in a newline, so they are concatenated as-is.
    pub fn drain_logs(&self) -> String {
        let mut logs = self.logs.lock().unwrap();
        let result = logs.concat();
        logs.clear();
        result
    }

    /// Returns a copy of the recorded entries without clearing them.
    pub fn entries(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }

    /// Number of entries written since the last drain.
    pub fn len(&self) -> usize {
        self.logs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prints all entries to stderr, clearing the internal buffer.
    ///
    /// Useful when a failing test should show what the logger produced.
    pub fn drain_to_console(&self) {
        let mut logs = self.logs.lock().unwrap();
        for log in logs.iter() {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(log));
            #[cfg(not(target_arch = "wasm32"))]
            eprint!("{}", log);
        }
        logs.clear();
    }
}

impl Sink for InMemorySink {
    fn write_entry(&self, entry: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(entry).into_owned();
        self.logs.lock().unwrap().push(text);
        Ok(entry.len())
    }

    fn prepare_to_die(&self) {
        // No-op, nothing is buffered outside memory
    }
}
