//! The condition variable itself: the doubly-linked waiter list, its lock,
//! and the three operations spec.md §4 names — `timed_wait`, `signal(n)`,
//! and the `unwait` cleanup factored into [`super::waiter::Waiter`].
//!
//! Grounded directly on `pthread_cond_timedwait()` and
//! `__private_cond_signal()` in
//! `original_source/pthread_cond_timedwait.c`; `broadcast` is that same
//! function called with every waiter claimed, exactly as musl's
//! `pthread_cond_broadcast` calls `__private_cond_signal(c, INT_MAX)`.

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use cvfutex_abi::{ClockId, Errno, Timespec, FUTEX_BITSET_MATCH_ANY};

use super::guard::WaitGuard;
use super::mutex::Mutex;
use super::waiter::{Waiter, SIGNALED, WAITING};
use crate::sys;

pub struct Condvar {
    pub(crate) lock: cvfutex_lib::SsdLock,
    pub(crate) head: Cell<*const Waiter>,
    pub(crate) tail: Cell<*const Waiter>,
    seq: AtomicU32,
    pub(crate) waiters: AtomicU32,
    clock: ClockId,
    shared: bool,
}

// SAFETY: `head`/`tail` are only read or written while holding `lock`
// (private cv) or are unused (shared cv); `seq`/`waiters` are atomics. The
// raw pointers stored in `head`/`tail` point at `Waiter`s whose lifetime is
// managed by `timed_wait`'s own stack frame, not by aliasing through
// `Condvar` itself, so both auto traits are sound to add back by hand.
unsafe impl Sync for Condvar {}
unsafe impl Send for Condvar {}

impl Condvar {
    pub const fn new(clock: ClockId) -> Self {
        Self {
            lock: cvfutex_lib::SsdLock::new(),
            head: Cell::new(core::ptr::null()),
            tail: Cell::new(core::ptr::null()),
            seq: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
            clock,
            shared: false,
        }
    }

    pub const fn new_shared(clock: ClockId) -> Self {
        Self {
            lock: cvfutex_lib::SsdLock::new(),
            head: Cell::new(core::ptr::null()),
            tail: Cell::new(core::ptr::null()),
            seq: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
            clock,
            shared: true,
        }
    }

    /// Block on `mutex` until signaled or `deadline` (absolute, measured on
    /// this cv's clock) elapses. `mutex` must already be held by the
    /// calling thread; it is released for the duration of the wait and
    /// re-acquired before returning, successfully or not, exactly as
    /// `pthread_cond_timedwait` guarantees.
    pub fn timed_wait(&self, mutex: &Mutex, deadline: Option<Timespec>) -> Result<(), Errno> {
        use cvfutex_abi::MutexType;

        if mutex.mtype().kind() != MutexType::NORMAL && mutex.owner() != sys::gettid() {
            return Err(Errno::Permission);
        }
        if let Some(ts) = deadline {
            if ts.is_malformed() {
                return Err(Errno::Invalid);
            }
        }

        let node = Waiter::new(self as *const Condvar, mutex as *const Mutex, self.shared);
        let seq: u32;

        if self.shared {
            self.waiters.fetch_add(1, Ordering::AcqRel);
            seq = self.seq.load(Ordering::Acquire);
        } else {
            self.lock.lock::<sys::LinuxFutex>();
            node.next.set(self.head.get());
            self.head.set(&node as *const Waiter);
            if self.tail.get().is_null() {
                self.tail.set(&node as *const Waiter);
            } else {
                unsafe { (*node.next.get()).prev.set(&node as *const Waiter) };
            }
            self.lock.unlock::<sys::LinuxFutex>();
            seq = WAITING;
        }

        mutex.unlock()?;

        // A guard that runs `unwait` on unwind or early return keeps the
        // RAII shape the teacher uses elsewhere for cleanup that must run
        // exactly once regardless of exit path; it is a no-op once the
        // explicit call below has already run.
        let guard = WaitGuard::new(&node);

        let word: &AtomicU32 = if self.shared { &self.seq } else { &node.state };

        let timeout_err = loop {
            let res = sys::futex_wait_bitset(
                word,
                seq,
                deadline.as_ref(),
                self.clock,
                FUTEX_BITSET_MATCH_ANY,
                self.shared,
            );
            let changed = word.load(Ordering::Acquire) != seq;
            match res {
                Err(e) => break Some(e),
                Ok(()) => {
                    if changed {
                        break None;
                    }
                }
            }
        };

        guard.disarm();
        node.unwait();

        match node.mutex_ret.get() {
            Some(err) => Err(err),
            None => match timeout_err {
                Some(err) => Err(err),
                None => Ok(()),
            },
        }
    }

    /// Wake up to `n` waiters (FIFO, oldest first). `n == u32::MAX` wakes
    /// every current waiter, matching `pthread_cond_broadcast`'s call into
    /// `__private_cond_signal(c, INT_MAX)`.
    pub fn signal(&self, n: u32) -> Result<(), Errno> {
        if self.shared {
            // Process-shared cvs have no locally visible waiter list (a
            // waiter may live in another process' address space); the only
            // available collaborator contract is waking the shared
            // sequence word directly.
            self.seq.fetch_add(1, Ordering::AcqRel);
            sys::futex_wake(&self.seq, n, true);
            return Ok(());
        }

        let mut remaining = n;
        let ref_count = AtomicU32::new(0);
        let mut q: *const Waiter = core::ptr::null();

        cvfutex_lib::diag_trace!("cond signal: claiming up to {} waiter(s)", n);

        self.lock.lock::<sys::LinuxFutex>();
        let mut p: *const Waiter = self.tail.get();
        while remaining > 0 && !p.is_null() {
            let node = unsafe { &*p };
            match node
                .state
                .compare_exchange(WAITING, SIGNALED, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    remaining -= 1;
                    if q.is_null() {
                        q = p;
                    }
                }
                Err(_) => {
                    ref_count.fetch_add(1, Ordering::AcqRel);
                    node.notify.set(&ref_count as *const AtomicU32);
                }
            }
            p = node.prev.get();
        }

        // Split the list: leave any untouched remainder on the cv.
        if !p.is_null() {
            let boundary = unsafe { &*p };
            if !boundary.next.get().is_null() {
                unsafe { (*boundary.next.get()).prev.set(core::ptr::null()) };
            }
            boundary.next.set(core::ptr::null());
        } else {
            self.head.set(core::ptr::null());
        }
        self.tail.set(p);
        self.lock.unlock::<sys::LinuxFutex>();

        loop {
            let cur = ref_count.load(Ordering::Acquire);
            if cur == 0 {
                break;
            }
            let _ = sys::futex_wait_bitset(
                &ref_count,
                cur,
                None,
                ClockId::Monotonic,
                FUTEX_BITSET_MATCH_ANY,
                false,
            );
        }

        let mut p = q;
        while !p.is_null() {
            let node = unsafe { &*p };
            let next_q = node.prev.get();
            if node.next.get().is_null() {
                sys::futex_wake(&node.state, 1, false);
            }
            node.barrier.unlock::<sys::LinuxFutex>();
            p = next_q;
        }

        Ok(())
    }

    pub fn broadcast(&self) -> Result<(), Errno> {
        self.signal(u32::MAX)
    }
}

#[cfg(test)]
extern crate std;
