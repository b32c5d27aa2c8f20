// SPDX-License-Identifier: MIT OR Apache-2.0

//! Buffer ownership tracking.
//!
//! Every formatted entry becomes an [`OwnedBuffer`] with exactly one owner at a time:
//!
//! 1. the log call, until it hands the buffer to the dispatcher;
//! 2. the blocking writer, which drops it at the end of the same call; or
//! 3. the [`PendingWrites`] table, which holds it under an [`OpId`] from submission
//!    until the executor's completion removes it.
//!
//! The [`BufferLedger`] counts buffers issued and released, so "every buffer was
//! freed exactly once" can be checked directly: after all completions have run,
//! `issued == released` and the pending table is empty.
//!
//! Closing a logger does not wait for in-flight writes. Callers that need every
//! submitted entry on disk await [`PendingWrites::drain`] (exposed as
//! [`crate::Logger::drain`]) before closing.

use crate::Level;
use crate::log_record::LogRecord;
use crate::spinlock::Spinlock;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::fs::File;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

/// Key of one async write in the pending table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(u64);

impl OpId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Counters of buffers created and reclaimed.
#[derive(Debug, Default)]
pub struct BufferLedger {
    issued: AtomicU64,
    released: AtomicU64,
    suppressed: AtomicU64,
}

/// A snapshot of a [`BufferLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BufferStats {
    /// Buffers produced by the formatter.
    pub issued: u64,
    /// Buffers dropped after their write finished (or was suppressed).
    pub released: u64,
    /// Console writes skipped because the logger is in test mode.
    pub suppressed: u64,
}

impl BufferStats {
    /// Buffers issued but not yet released.
    pub fn in_flight(&self) -> u64 {
        self.issued - self.released
    }
}

impl BufferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> BufferStats {
        //released is read first so a concurrent release can't make in_flight negative
        let released = self.released.load(Ordering::Acquire);
        BufferStats {
            issued: self.issued.load(Ordering::Acquire),
            released,
            suppressed: self.suppressed.load(Ordering::Acquire),
        }
    }
}

/**
A formatted entry owned by whichever write path currently holds it.

Dropping the buffer is the "free": it is counted as released exactly once. The
bytes are the record's own allocation; handing them to an executor shares them
without a copy.
*/
pub(crate) struct OwnedBuffer {
    bytes: Arc<Vec<u8>>,
    level: Level,
    ledger: Arc<BufferLedger>,
}

impl OwnedBuffer {
    pub(crate) fn new(record: LogRecord, ledger: &Arc<BufferLedger>) -> Self {
        ledger.issued.fetch_add(1, Ordering::AcqRel);
        Self {
            level: record.level(),
            bytes: Arc::new(record.into_bytes()),
            ledger: ledger.clone(),
        }
    }

    pub(crate) fn level(&self) -> Level {
        self.level
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A second handle to the bytes for the executor. Ownership stays with `self`.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub(crate) fn shared(&self) -> Arc<Vec<u8>> {
        self.bytes.clone()
    }

    pub(crate) fn mark_suppressed(&self) {
        self.ledger.suppressed.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::AcqRel);
    }
}

impl Debug for OwnedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedBuffer")
            .field("level", &self.level)
            .field("len", &self.bytes.len())
            .finish()
    }
}

//one in-flight async write; the file clone keeps the descriptor open until completion
#[derive(Debug)]
struct PendingWrite {
    _buffer: OwnedBuffer,
    _file: Arc<File>,
}

#[derive(Debug, Default)]
struct PendingState {
    ops: HashMap<OpId, PendingWrite>,
    waiters: Vec<Waker>,
}

/**
The table of async writes that were submitted but have not completed.
*/
pub struct PendingWrites {
    next_id: AtomicU64,
    state: Spinlock<PendingState>,
}

impl Debug for PendingWrites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingWrites")
            .field("len", &self.len())
            .finish()
    }
}

impl Default for PendingWrites {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingWrites {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state: Spinlock::new(PendingState::default()),
        }
    }

    /// Takes ownership of `buffer` until [`Self::complete`] is called with the returned id.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub(crate) fn insert(&self, buffer: OwnedBuffer, file: Arc<File>) -> OpId {
        let id = OpId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let write = PendingWrite {
            _buffer: buffer,
            _file: file,
        };
        self.state.with_mut(|state| {
            state.ops.insert(id, write);
        });
        id
    }

    /**
    Reclaims the buffer of a finished write.

    # Panics

    If `id` is not pending (completed twice, or never submitted), or if `result` is
    not positive. Both mean the executor broke its contract.
    */
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub(crate) fn complete(&self, id: OpId, result: isize) {
        let (write, waiters) = self.state.with_mut(|state| {
            let write = state.ops.remove(&id);
            let waiters = if state.ops.is_empty() {
                std::mem::take(&mut state.waiters)
            } else {
                Vec::new()
            };
            (write, waiters)
        });
        //free, then wake, both outside the lock
        let found = write.is_some();
        drop(write);
        for waker in waiters {
            waker.wake();
        }
        assert!(found, "completion for {id}, which is not pending");
        assert!(result > 0, "async log write {id} completed with result {result}");
    }

    pub fn len(&self) -> usize {
        self.state.with(|state| state.ops.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A future that resolves once no writes are pending.
    pub fn drain(self: &Arc<Self>) -> Drain {
        Drain {
            pending: self.clone(),
        }
    }
}

/**
Future returned by [`PendingWrites::drain`].

Resolves immediately when nothing is pending; otherwise it is woken by the
completion that empties the table.
*/
#[derive(Debug)]
pub struct Drain {
    pending: Arc<PendingWrites>,
}

impl Future for Drain {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.pending.state.with_mut(|state| {
            if state.ops.is_empty() {
                Poll::Ready(())
            } else {
                if !state.waiters.iter().any(|w| w.will_wake(cx.waker())) {
                    state.waiters.push(cx.waker().clone());
                }
                Poll::Pending
            }
        })
    }
}
