// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A reader/writer spinlock for the two places logwire shares mutable state:
the pending-write table and the process-wide logger slot.

Both critical sections are a map insert/remove or an `Arc` clone, so spinning is
cheaper than parking.  The lock must be held for as short a time as possible;
never perform I/O or call user code while holding it.

`new` is `const` so the lock can back a `static`.
*/

use std::cell::UnsafeCell;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
//up to 254 readers, or 1 writer (val = 255)
const LOCKED_WRITE: u8 = u8::MAX;

pub(crate) struct Spinlock<T> {
    data: UnsafeCell<T>,
    state: AtomicU8,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send + Sync> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    pub(crate) const fn new(data: T) -> Self {
        Spinlock {
            data: UnsafeCell::new(data),
            state: AtomicU8::new(UNLOCKED),
        }
    }

    fn lock_write(&self) {
        while self
            .state
            .compare_exchange_weak(UNLOCKED, LOCKED_WRITE, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    fn lock_read(&self) {
        while self
            .state
            .fetch_update(Acquire, Relaxed, |v| (v < LOCKED_WRITE - 1).then_some(v + 1))
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    /// Runs `f` with exclusive access.
    pub(crate) fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.lock_write();
        let _unlock = Unlock {
            state: &self.state,
            write: true,
        };
        // SAFETY: the write lock excludes every other accessor
        unsafe { f(&mut *self.data.get()) }
    }

    /// Runs `f` with shared access.
    pub(crate) fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.lock_read();
        let _unlock = Unlock {
            state: &self.state,
            write: false,
        };
        // SAFETY: readers only exclude writers
        unsafe { f(&*self.data.get()) }
    }
}

//releases on drop so a panicking closure (a failed assertion in a completion) cannot wedge the lock
struct Unlock<'a> {
    state: &'a AtomicU8,
    write: bool,
}

impl Drop for Unlock<'_> {
    fn drop(&mut self) {
        if self.write {
            self.state.store(UNLOCKED, Release);
        } else {
            self.state.fetch_sub(1, Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Spinlock;
    use std::sync::Arc;
    use std::thread;

    static COUNTER: Spinlock<u32> = Spinlock::new(0);

    #[test]
    fn static_lock_counts_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    for _ in 0..1000 {
                        COUNTER.with_mut(|c| *c += 1);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(COUNTER.with(|c| *c), 4000);
    }

    #[test]
    fn lock_is_released_after_panic() {
        let lock = Arc::new(Spinlock::new(Vec::<u8>::new()));
        let inner = lock.clone();
        let result = thread::spawn(move || {
            inner.with_mut(|v| {
                v.push(1);
                panic!("inside critical section");
            })
        })
        .join();
        assert!(result.is_err());
        assert_eq!(lock.with(|v| v.len()), 1);
    }
}
