// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use logwire::executor::{AsyncWriteExecutor, Completion, WriteOp};
use std::fs::File;
use std::io::Write;
use std::os::fd::BorrowedFd;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An executor that queues submissions until the test runs them.
#[derive(Default)]
pub struct ManualExecutor {
    closed: AtomicBool,
    submitted: AtomicUsize,
    queue: Mutex<Vec<(WriteOp, Completion)>>,
}

impl std::fmt::Debug for ManualExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualExecutor")
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .field("submitted", &self.submitted())
            .field("queued", &self.queued())
            .finish()
    }
}

impl ManualExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Acquire)
    }

    pub fn queued(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Ids, descriptors and bodies of the queued operations.
    pub fn queued_ops(&self) -> Vec<WriteOp> {
        self.queue
            .lock()
            .unwrap()
            .iter()
            .map(|(op, _)| op.clone())
            .collect()
    }

    /// Performs every queued write and invokes its completion. Returns how many ran.
    pub fn run_all(&self) -> usize {
        let ops = std::mem::take(&mut *self.queue.lock().unwrap());
        let count = ops.len();
        for (op, on_complete) in ops {
            assert_eq!(op.offset, 0);
            // SAFETY: the logger keeps the descriptor open until on_complete runs
            let fd = unsafe { BorrowedFd::borrow_raw(op.fd) };
            let mut file = File::from(fd.try_clone_to_owned().unwrap());
            let written = file.write(&op.buf).unwrap();
            on_complete(written as isize);
        }
        count
    }

    /// Invokes every queued completion with `result` without writing anything.
    pub fn complete_all_with(&self, result: isize) -> usize {
        let ops = std::mem::take(&mut *self.queue.lock().unwrap());
        let count = ops.len();
        for (_, on_complete) in ops {
            on_complete(result);
        }
        count
    }
}

impl AsyncWriteExecutor for ManualExecutor {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn submit_write(&self, op: WriteOp, on_complete: Completion) {
        self.submitted.fetch_add(1, Ordering::AcqRel);
        self.queue.lock().unwrap().push((op, on_complete));
    }
}
