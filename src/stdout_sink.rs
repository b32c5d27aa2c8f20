// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::sink::Sink;
use std::io;

/**
The default console sink, writing to standard output.
 */
#[derive(Debug, Clone)]
pub struct StdoutSink {}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Clone: derived, appropriate for a zero-sized struct
// - Copy: implemented, no heap allocation
// - PartialEq/Eq/Hash: all instances are equivalent
// - Default: implemented, zero-argument constructor
// - Send/Sync: automatic for a zero-sized struct

impl Copy for StdoutSink {}

impl PartialEq for StdoutSink {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for StdoutSink {}

impl std::hash::Hash for StdoutSink {
    fn hash<H: std::hash::Hasher>(&self, _state: &mut H) {}
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutSink {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Sink for StdoutSink {
    fn write_entry(&self, entry: &[u8]) -> io::Result<usize> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let mut lock = io::stdout().lock();
            lock.write_all(entry)?;
            lock.flush()?;
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg = String::from_utf8_lossy(entry);
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg.trim_end()));
        }
        Ok(entry.len())
    }

    fn prepare_to_die(&self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            //best effort, the process is on its way out
            let _ = io::stdout().flush();
        }
    }
}
