//! Ergonomic, `std::sync`-shaped wrapper over `cvfutex_core`'s condvar and
//! mutex: a data-carrying `Mutex<T>` with a guard, and a `Condvar` that
//! takes and returns that guard across a wait — the public surface spec.md
//! describes informally as "the mutex contract" and "the CV contract",
//! given real Rust types.
//!
//! No heap, no `std`: everything here is built directly on
//! `cvfutex_core::sync::{Mutex, Condvar}`, the same no-std discipline the
//! rest of the workspace keeps.

#![no_std]

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use cvfutex_abi::{ClockId, Errno, MutexType, Timespec};

/// A mutex that owns the data it protects, like `std::sync::Mutex<T>`, but
/// backed by the futex-based [`cvfutex_core::sync::Mutex`] instead of a
/// platform mutex.
pub struct Mutex<T> {
    inner: cvfutex_core::Mutex,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for Mutex<T> {}
unsafe impl<T: Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: cvfutex_core::Mutex::new(MutexType::NORMAL),
            data: UnsafeCell::new(value),
        }
    }

    pub const fn new_with_type(value: T, kind: MutexType) -> Self {
        Self {
            inner: cvfutex_core::Mutex::new(kind),
            data: UnsafeCell::new(value),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, T>, Errno> {
        self.inner.lock()?;
        Ok(MutexGuard { mutex: self })
    }

    pub fn try_lock(&self) -> Result<Option<MutexGuard<'_, T>>, Errno> {
        if self.inner.try_lock()? {
            Ok(Some(MutexGuard { mutex: self }))
        } else {
            Ok(None)
        }
    }
}

pub struct MutexGuard<'a, T> {
    mutex: &'a Mutex<T>,
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.inner.unlock().expect("mutex unlock");
    }
}

/// A condition variable that takes and hands back a [`MutexGuard`] across
/// the wait, exactly the borrow-checked shape `std::sync::Condvar` uses
/// to make "the mutex is held again on return" a type-level guarantee
/// rather than a documented precondition.
pub struct Condvar {
    inner: cvfutex_core::Condvar,
    clock: ClockId,
}

impl Condvar {
    pub const fn new() -> Self {
        Self {
            inner: cvfutex_core::Condvar::new(ClockId::Monotonic),
            clock: ClockId::Monotonic,
        }
    }

    pub const fn new_with_clock(clock: ClockId) -> Self {
        Self {
            inner: cvfutex_core::Condvar::new(clock),
            clock,
        }
    }

    /// Block until signaled. The mutex is released for the duration of the
    /// wait and re-acquired before this returns, whether signaled or not.
    pub fn wait<'a, T>(&self, guard: MutexGuard<'a, T>) -> Result<MutexGuard<'a, T>, Errno> {
        let mutex = guard.mutex;
        core::mem::forget(guard);
        let res = self.inner.timed_wait(&mutex.inner, None);
        let guard = MutexGuard { mutex };
        res.map(|()| guard)
    }

    /// As [`Self::wait`], but returns `Err(Errno::Timeout)` if `rel`
    /// elapses first. The guard is always handed back alongside the
    /// result's `Ok`/`Err` via the caller re-locking path: on timeout the
    /// mutex is still re-acquired (matching `pthread_cond_timedwait`
    /// semantics), so callers should treat the returned guard as valid in
    /// both cases.
    pub fn wait_timeout<'a, T>(
        &self,
        guard: MutexGuard<'a, T>,
        rel: Timespec,
    ) -> (MutexGuard<'a, T>, Result<(), Errno>) {
        let mutex = guard.mutex;
        core::mem::forget(guard);
        let deadline = absolute_deadline(self.clock, rel);
        let res = self.inner.timed_wait(&mutex.inner, Some(deadline));
        (MutexGuard { mutex }, res)
    }

    pub fn notify_one(&self) -> Result<(), Errno> {
        self.inner.signal(1)
    }

    pub fn notify_all(&self) -> Result<(), Errno> {
        self.inner.broadcast()
    }
}

impl Default for Condvar {
    fn default() -> Self {
        Self::new()
    }
}

fn absolute_deadline(clock: ClockId, rel: Timespec) -> Timespec {
    let now = cvfutex_core::sys::clock_gettime(clock);
    let nanos = now.as_nanos() + rel.as_nanos();
    Timespec {
        tv_sec: (nanos / 1_000_000_000) as i64,
        tv_nsec: (nanos % 1_000_000_000) as i64,
    }
}

#[cfg(test)]
extern crate std;
