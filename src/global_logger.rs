// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide logger slot.
//!
//! Applications that prefer not to thread a [`Logger`] through their call graph can
//! install one here with [`init`] and reach it from anywhere with [`global`].
//!
//! # Init once
//!
//! [`init`] may succeed at most once per process. Calling it again after a success,
//! even after [`deinit`], panics: it signals a defect in the program's startup
//! sequence, not a runtime condition. A failed [`init`] installs nothing and may be
//! retried.
//!
//! # Example
//!
//! ```
//! use logwire::{Config, global_logger};
//!
//! global_logger::init(Config::new().levels(["WARN", "ERROR", "FATAL"]).test_mode(true)).unwrap();
//!
//! if let Some(logger) = global_logger::global() {
//!     logwire::warn!(logger, "disk usage at {}%", 91);
//! }
//!
//! global_logger::deinit();
//! ```
//!
//! # Spinlock vs Mutex
//!
//! The slot is a spinlock-protected `Option<Arc<Logger>>`. The critical sections only
//! clone or take the `Arc`; opening the log file happens outside the lock.

use crate::config::Config;
use crate::error::Result;
use crate::logger::Logger;
use crate::spinlock::Spinlock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

static GLOBAL_LOGGER: Spinlock<Option<Arc<Logger>>> = Spinlock::new(None);

//set by the first init that gets past the check; cleared only if that init fails
static INIT_CLAIMED: AtomicBool = AtomicBool::new(false);

/**
Opens a logger from `config` and installs it as the process-wide logger.

# Panics

If a previous call succeeded.
*/
pub fn init(config: Config) -> Result<()> {
    if INIT_CLAIMED.swap(true, Ordering::AcqRel) {
        panic!("logwire: logger initialized twice");
    }
    match Logger::open(config) {
        Ok(logger) => {
            let logger = Arc::new(logger);
            GLOBAL_LOGGER.with_mut(|slot| *slot = Some(logger));
            Ok(())
        }
        Err(e) => {
            INIT_CLAIMED.store(false, Ordering::Release);
            Err(e)
        }
    }
}

/// The installed logger, if any.
pub fn global() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER.with(|slot| slot.clone())
}

/**
Uninstalls the process-wide logger and releases its output.

Returns the number of async writes that were still in flight. If other clones of
the logger are alive, the output is released when the last one drops. Calling
`deinit` with nothing installed does nothing and returns 0.
*/
pub fn deinit() -> usize {
    let Some(logger) = GLOBAL_LOGGER.with_mut(Option::take) else {
        return 0;
    };
    match Arc::try_unwrap(logger) {
        Ok(logger) => logger.close(),
        Err(shared) => shared.pending_writes(),
    }
}
