// SPDX-License-Identifier: MIT OR Apache-2.0

//! The contract an external async I/O executor fulfils.
//!
//! logwire does not run an event loop of its own. When an executor is configured
//! (and the log file was opened as a raw descriptor), non-fatal entries are handed
//! to it as [`WriteOp`]s and the call returns immediately. The executor performs the
//! write on its own schedule and reports the result through the [`Completion`].
//!
//! # Delivery
//!
//! Async writes are fire-and-forget. A failed or abandoned write is never reported
//! to the code that logged the entry, and nothing is retried. Use the blocking path
//! (no executor) when every entry must be durable.
//!
//! # Example
//!
//! An executor that performs each write inline:
//!
//! ```rust
//! # #[cfg(target_os = "linux")] {
//! use logwire::executor::{AsyncWriteExecutor, Completion, WriteOp};
//! use std::fs::File;
//! use std::io::Write;
//! use std::os::fd::BorrowedFd;
//!
//! #[derive(Debug)]
//! struct Inline;
//!
//! impl AsyncWriteExecutor for Inline {
//!     fn is_closed(&self) -> bool {
//!         false
//!     }
//!
//!     fn submit_write(&self, op: WriteOp, on_complete: Completion) {
//!         // SAFETY: the descriptor stays open until `on_complete` runs
//!         let fd = unsafe { BorrowedFd::borrow_raw(op.fd) };
//!         let result = fd
//!             .try_clone_to_owned()
//!             .map(File::from)
//!             .and_then(|mut f| f.write(&op.buf));
//!         on_complete(result.map(|n| n as isize).unwrap_or(-1));
//!     }
//! }
//! # }
//! ```

use crate::pending::OpId;
use std::fmt::Debug;
use std::sync::Arc;

/// A raw file descriptor as submitted to the executor.
#[cfg(unix)]
pub type RawDescriptor = std::os::fd::RawFd;
/// A raw file descriptor as submitted to the executor.
#[cfg(not(unix))]
pub type RawDescriptor = i32;

/**
Callback invoked once a submitted write finishes.

The argument is the OS result: bytes written when positive, a negated error code
otherwise. The callback must be invoked exactly once per submitted [`WriteOp`].
*/
pub type Completion = Box<dyn FnOnce(isize) + Send + 'static>;

/// One write submitted to the executor.
#[derive(Debug, Clone)]
pub struct WriteOp {
    /// The pending-write table key for this operation.
    pub id: OpId,
    /// The descriptor to write to. It stays open until the completion runs.
    pub fd: RawDescriptor,
    /// The entry bytes, shared with the logger's pending table.
    pub buf: Arc<Vec<u8>>,
    /// Write offset. Always 0; the descriptor was opened for append.
    pub offset: u64,
}

impl WriteOp {
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/**
An async I/O executor that can accept descriptor writes.

"No executor" is modeled by not configuring one, which forces every write onto the
blocking path.
*/
pub trait AsyncWriteExecutor: Debug + Send + Sync {
    /// Whether the executor's event loop has shut down. A closed executor receives no
    /// further submissions; writes fall back to the blocking path.
    fn is_closed(&self) -> bool;

    /// Queues `op` and returns without waiting for it. `on_complete` is called with
    /// the result once the OS write finishes.
    fn submit_write(&self, op: WriteOp, on_complete: Completion);
}
