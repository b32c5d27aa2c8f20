// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger instance: level filter, formatter and dispatcher behind one value.
//!
//! A [`Logger`] is opened once by the application's composition root and shared by
//! reference (or through [`crate::global_logger`]). Its level mask and output are
//! fixed when it is opened and are read without locking afterwards.

use crate::config::{Config, Timezone};
use crate::context::ContextEntry;
use crate::dispatch::{Dispatcher, FileHandle, Output, OutputMode};
use crate::error::Result;
use crate::formatter;
use crate::level::{Level, LevelMask};
use crate::log_record::CallSite;
use crate::pending::{BufferLedger, BufferStats, Drain, OwnedBuffer, PendingWrites};
use crate::sink::Sink;
use crate::stdout_sink::StdoutSink;
use std::fmt::Arguments;
use std::sync::Arc;

#[derive(Debug)]
pub struct Logger {
    levels: LevelMask,
    timezone: Timezone,
    dispatcher: Dispatcher,
    ledger: Arc<BufferLedger>,
    pending: Arc<PendingWrites>,
}

impl Logger {
    /**
    Opens a logger.

    Level names are parsed first; an unknown name fails with
    [`crate::Error::InvalidLogLevel`] before any file is touched. With a file path the
    file is created (mode `0644`) or opened for append. On Linux, when an executor is
    configured, the file is kept as a raw descriptor so non-fatal entries can be
    submitted asynchronously.
    */
    pub fn open(config: Config) -> Result<Self> {
        let levels = LevelMask::parse(&config.levels)?;
        let output = match &config.file {
            None => Output::Console,
            Some(path) => Output::File(FileHandle::open(path, config.executor.is_some())?),
        };
        let console: Arc<dyn Sink> = match config.console {
            Some(sink) => sink,
            None => Arc::new(StdoutSink::new()),
        };
        let pending = Arc::new(PendingWrites::new());
        let dispatcher = Dispatcher::new(
            output,
            console,
            config.executor,
            pending.clone(),
            config.test_mode,
        );
        Ok(Self {
            levels,
            timezone: config.timezone,
            dispatcher,
            ledger: Arc::new(BufferLedger::new()),
            pending,
        })
    }

    /// Whether entries at `level` are written. Disabled calls cost only this check.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.levels.contains(level)
    }

    pub fn levels(&self) -> LevelMask {
        self.levels
    }

    pub fn output_mode(&self) -> OutputMode {
        self.dispatcher.output_mode()
    }

    /// Whether a non-fatal entry logged now would go through the executor.
    pub fn async_available(&self) -> bool {
        self.dispatcher.async_available()
    }

    /**
    Formats and writes one entry.

    Does nothing at all when `level` is disabled. Usually called through the
    [`crate::info!`] family of macros, which fill in `site`.
    */
    pub fn log(
        &self,
        level: Level,
        args: Arguments<'_>,
        context: Option<&[ContextEntry<'_>]>,
        site: CallSite,
    ) {
        if !self.enabled(level) {
            return;
        }
        let timestamp = self.timezone.now();
        let record = formatter::format_record(level, args, context, site, &timestamp);
        self.dispatcher.dispatch(OwnedBuffer::new(record, &self.ledger));
    }

    pub fn debug(
        &self,
        args: Arguments<'_>,
        context: Option<&[ContextEntry<'_>]>,
        site: CallSite,
    ) {
        self.log(Level::Debug, args, context, site)
    }

    pub fn info(
        &self,
        args: Arguments<'_>,
        context: Option<&[ContextEntry<'_>]>,
        site: CallSite,
    ) {
        self.log(Level::Info, args, context, site)
    }

    pub fn warn(
        &self,
        args: Arguments<'_>,
        context: Option<&[ContextEntry<'_>]>,
        site: CallSite,
    ) {
        self.log(Level::Warn, args, context, site)
    }

    pub fn err(
        &self,
        args: Arguments<'_>,
        context: Option<&[ContextEntry<'_>]>,
        site: CallSite,
    ) {
        self.log(Level::Error, args, context, site)
    }

    /// Always written synchronously, and echoed to the console when the output is a file.
    pub fn fatal(
        &self,
        args: Arguments<'_>,
        context: Option<&[ContextEntry<'_>]>,
        site: CallSite,
    ) {
        self.log(Level::Fatal, args, context, site)
    }

    pub fn stats(&self) -> BufferStats {
        self.ledger.stats()
    }

    /// Number of async writes submitted but not yet completed.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Resolves once every submitted async write has completed.
    pub fn drain(&self) -> Drain {
        self.pending.drain()
    }

    /**
    The application may imminently exit.  Sync the log file and flush the console.
    */
    pub fn prepare_to_die(&self) {
        self.dispatcher.prepare_to_die();
    }

    /**
    Closes the logger and returns the number of async writes still in flight,
    including the warning this call logs about them when WARN is enabled.

    Does not wait for them. Each in-flight write keeps the descriptor open until its
    completion runs, then the file is closed by whichever completion finishes last.
    Await [`Logger::drain`] first to close with nothing outstanding.
    */
    pub fn close(self) -> usize {
        let outstanding = self.pending_writes();
        if outstanding > 0 {
            crate::warn!(
                self,
                "closing with {outstanding} async writes in flight; they will not be awaited"
            );
        }
        //read after the warning, which may itself have been submitted
        let in_flight = self.pending_writes();
        self.prepare_to_die();
        in_flight
    }
}
