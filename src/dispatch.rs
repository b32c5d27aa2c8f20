// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write dispatch: choosing between the blocking and the async path.
//!
//! For each entry that passed the level filter:
//!
//! 1. FATAL entries, loggers without an executor, loggers whose executor reports its
//!    event loop closed, and loggers whose file is not a raw descriptor all take the
//!    **blocking** path.
//! 2. Everything else is **submitted** to the executor and the call returns at once.
//!
//! The blocking path writes the whole entry in one call, checks the byte count
//! (a short write panics, it is not retried), and drops the buffer. The async path
//! parks the buffer in the pending table; the completion callback reclaims it.
//!
//! FATAL entries are additionally echoed to the console sink when the output is a
//! file, so an operator sees them even if the process exits before anyone reads
//! the log file.

use crate::Level;
use crate::error::{Error, Result};
use crate::executor::AsyncWriteExecutor;
use crate::pending::{OwnedBuffer, PendingWrites};
use crate::sink::Sink;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Permission bits for a newly created log file.
pub const LOG_FILE_MODE: u32 = 0o644;

/// Where a logger's entries go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMode {
    Console,
    File,
}

/**
An open log file.

A `Descriptor` handle is only created on Linux when an executor is configured; it
is the only kind the async path can submit against. Every other configuration gets
a `Locked` handle and writes synchronously. Neither kind buffers: each entry is
one `write` call on the file.
*/
#[derive(Debug)]
pub(crate) enum FileHandle {
    #[cfg(target_os = "linux")]
    Descriptor(Arc<File>),
    Locked(Mutex<File>),
}

impl FileHandle {
    pub(crate) fn open(path: &Path, descriptor: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(LOG_FILE_MODE);
        }
        let file = options
            .open(path)
            .map_err(|source| Error::FailedToOpenLogFile {
                path: path.to_path_buf(),
                source,
            })?;

        #[cfg(target_os = "linux")]
        {
            if descriptor {
                return Ok(FileHandle::Descriptor(Arc::new(file)));
            }
        }
        #[cfg(not(target_os = "linux"))]
        let _ = descriptor;

        Ok(FileHandle::Locked(Mutex::new(file)))
    }

    //the file is opened for append, so every write lands at the end without a seek
    fn write_blocking(&self, bytes: &[u8]) {
        match self {
            #[cfg(target_os = "linux")]
            FileHandle::Descriptor(file) => write_once(&**file, bytes, "log file"),
            FileHandle::Locked(file) => write_once(&*file.lock().unwrap(), bytes, "log file"),
        }
    }

    //best effort, the process may be on its way out
    fn sync(&self) {
        match self {
            #[cfg(target_os = "linux")]
            FileHandle::Descriptor(file) => {
                let _ = file.sync_data();
            }
            FileHandle::Locked(file) => {
                if let Ok(file) = file.lock() {
                    let _ = file.sync_data();
                }
            }
        }
    }

    pub(crate) fn is_descriptor(&self) -> bool {
        match self {
            #[cfg(target_os = "linux")]
            FileHandle::Descriptor(_) => true,
            FileHandle::Locked(_) => false,
        }
    }
}

/**
Writes `bytes` with exactly one `write` call.

# Panics

On an I/O error, or if fewer bytes than `bytes.len()` were accepted. Short writes
are not retried.
*/
fn write_once(mut out: impl Write, bytes: &[u8], target: &str) {
    let written = out
        .write(bytes)
        .unwrap_or_else(|e| panic!("Can't write to {target}: {e}"));
    assert_eq!(written, bytes.len(), "short write to {target}");
}

#[derive(Debug)]
pub(crate) enum Output {
    Console,
    File(FileHandle),
}

#[derive(Debug)]
pub(crate) struct Dispatcher {
    output: Output,
    console: Arc<dyn Sink>,
    executor: Option<Arc<dyn AsyncWriteExecutor>>,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pending: Arc<PendingWrites>,
    test_mode: bool,
}

impl Dispatcher {
    pub(crate) fn new(
        output: Output,
        console: Arc<dyn Sink>,
        executor: Option<Arc<dyn AsyncWriteExecutor>>,
        pending: Arc<PendingWrites>,
        test_mode: bool,
    ) -> Self {
        Self {
            output,
            console,
            executor,
            pending,
            test_mode,
        }
    }

    pub(crate) fn output_mode(&self) -> OutputMode {
        match self.output {
            Output::Console => OutputMode::Console,
            Output::File(_) => OutputMode::File,
        }
    }

    /// Whether a non-fatal entry would currently be submitted asynchronously.
    pub(crate) fn async_available(&self) -> bool {
        let descriptor = matches!(&self.output, Output::File(handle) if handle.is_descriptor());
        descriptor
            && self
                .executor
                .as_ref()
                .is_some_and(|executor| !executor.is_closed())
    }

    pub(crate) fn dispatch(&self, buffer: OwnedBuffer) {
        let buffer = if buffer.level() == Level::Fatal {
            buffer
        } else {
            match self.try_submit(buffer) {
                Ok(()) => return,
                Err(buffer) => buffer,
            }
        };
        self.write_blocking(buffer);
    }

    /// Hands the buffer to the executor, or gives it back when the async path is unavailable.
    #[cfg(target_os = "linux")]
    fn try_submit(&self, buffer: OwnedBuffer) -> std::result::Result<(), OwnedBuffer> {
        use crate::executor::WriteOp;
        use std::os::fd::AsRawFd;

        let (Some(executor), Output::File(FileHandle::Descriptor(file))) =
            (&self.executor, &self.output)
        else {
            return Err(buffer);
        };
        if executor.is_closed() {
            return Err(buffer);
        }

        let fd = file.as_raw_fd();
        let buf = buffer.shared();
        let id = self.pending.insert(buffer, file.clone());
        let pending = self.pending.clone();
        executor.submit_write(
            WriteOp {
                id,
                fd,
                buf,
                offset: 0,
            },
            Box::new(move |result| pending.complete(id, result)),
        );
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn try_submit(&self, buffer: OwnedBuffer) -> std::result::Result<(), OwnedBuffer> {
        Err(buffer)
    }

    fn write_blocking(&self, buffer: OwnedBuffer) {
        let fatal = buffer.level() == Level::Fatal;
        match &self.output {
            Output::Console => self.write_console(&buffer),
            Output::File(handle) => {
                handle.write_blocking(buffer.as_bytes());
                if fatal {
                    self.write_console(&buffer);
                }
            }
        }
        if fatal {
            self.prepare_to_die();
        }
    }

    fn write_console(&self, buffer: &OwnedBuffer) {
        if self.test_mode {
            buffer.mark_suppressed();
            return;
        }
        let bytes = buffer.as_bytes();
        let written = self
            .console
            .write_entry(bytes)
            .expect("Can't log to console");
        assert_eq!(written, bytes.len(), "short write to console");
    }

    pub(crate) fn prepare_to_die(&self) {
        if let Output::File(handle) = &self.output {
            handle.sync();
        }
        self.console.prepare_to_die();
    }
}
