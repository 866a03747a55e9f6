//! The waiter node: automatic (stack) storage for one thread's participation
//! in a condition variable wait, directly transliterating musl's
//! `struct waiter` and its `lock`/`unlock`/`unwait` functions.
//!
//! > Waiter objects have automatic storage on the waiting thread, and are
//! > used in building a linked list representing waiters currently waiting
//! > on the condition variable or a group of waiters woken together by a
//! > broadcast or signal [...] Waiter lists attached to the condition
//! > variable itself are protected by the lock on the cv. Detached waiter
//! > lists are protected by the associated mutex. The hand-off between
//! > protections is handled by a "barrier" lock in each node [...]
//!
//! (comment preserved from `original_source/pthread_cond_timedwait.c`,
//! the exact design this module ports)

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use cvfutex_abi::Errno;
use cvfutex_lib::SsdLock;

use super::condvar::Condvar;
use super::mutex::Mutex;
use crate::sys::{self, LinuxFutex};

pub const WAITING: u32 = 0;
pub const SIGNALED: u32 = 1;
pub const LEAVING: u32 = 2;

/// One thread's node in a condvar's doubly-linked waiter list.
///
/// Lives on the waiting thread's stack for the duration of `timed_wait`;
/// never heap-allocated, matching the teacher's general avoidance of
/// allocation in synchronization primitives (`lib/src/waitqueue.rs`'s
/// fixed-capacity arrays serve the same no-alloc goal by a different
/// route). Holds raw pointers to its cv/mutex rather than borrows because
/// the list it threads itself into is inherently self-referential; callers
/// (`Condvar::timed_wait`) are responsible for keeping the referents alive
/// for the node's whole lifetime.
pub struct Waiter {
    pub(crate) prev: Cell<*const Waiter>,
    pub(crate) next: Cell<*const Waiter>,
    pub(crate) state: AtomicU32,
    pub(crate) barrier: SsdLock,
    pub(crate) requeued: Cell<bool>,
    pub(crate) mutex_ret: Cell<Option<Errno>>,
    pub(crate) notify: Cell<*const AtomicU32>,
    pub(crate) mutex: *const Mutex,
    pub(crate) cond: *const Condvar,
    pub(crate) shared: bool,
}

impl Waiter {
    pub fn new(cond: *const Condvar, mutex: *const Mutex, shared: bool) -> Self {
        Self {
            prev: Cell::new(core::ptr::null()),
            next: Cell::new(core::ptr::null()),
            state: AtomicU32::new(WAITING),
            barrier: SsdLock::new_held(),
            requeued: Cell::new(false),
            mutex_ret: Cell::new(None),
            notify: Cell::new(core::ptr::null()),
            mutex,
            cond,
            shared,
        }
    }

    #[inline]
    fn cond(&self) -> &Condvar {
        // SAFETY: valid for the lifetime of the enclosing `timed_wait` call.
        unsafe { &*self.cond }
    }

    #[inline]
    fn mutex(&self) -> &Mutex {
        // SAFETY: same as `cond()`.
        unsafe { &*self.mutex }
    }

    /// Cleanup run exactly once per wait, on the normal return path and
    /// (via [`super::guard::WaitGuard`]) on cancellation — idempotent
    /// because a second call always observes `oldstate != WAITING` and
    /// falls straight through to re-locking the mutex.
    ///
    /// Mirrors `unwait()` line for line; see the function body comments in
    /// `original_source/pthread_cond_timedwait.c` for the invariants each
    /// branch relies on.
    pub fn unwait(&self) {
        if self.shared {
            let c = self.cond();
            if c.waiters.fetch_sub(1, Ordering::AcqRel) == SHARED_SENTINEL {
                sys::futex_wake(&c.waiters, 1, true);
            }
            self.mutex_ret.set(self.mutex().lock().err());
            return;
        }

        let oldstate = match self.state.compare_exchange(
            WAITING,
            LEAVING,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => WAITING,
            Err(actual) => actual,
        };

        if oldstate == WAITING {
            // This waiter was never signaled: we can still touch the cv's
            // list directly because the departure the cv lock protects
            // against (a signal claiming this node) cannot happen once the
            // node is LEAVING without going through the notify handshake
            // below.
            let c = self.cond();
            c.lock.lock::<LinuxFutex>();

            if core::ptr::eq(c.head.get(), self) {
                c.head.set(self.next.get());
            } else if !self.prev.get().is_null() {
                unsafe { (*self.prev.get()).next.set(self.next.get()) };
            }
            if core::ptr::eq(c.tail.get(), self) {
                c.tail.set(self.prev.get());
            } else if !self.next.get().is_null() {
                unsafe { (*self.next.get()).prev.set(self.prev.get()) };
            }

            c.lock.unlock::<LinuxFutex>();

            let notify = self.notify.get();
            if !notify.is_null() {
                let r = unsafe { &*notify };
                if r.fetch_sub(1, Ordering::AcqRel) == 1 {
                    sys::futex_wake(r, 1, false);
                }
            }
        }

        self.mutex_ret.set(self.mutex().lock().err());

        if oldstate == WAITING {
            return;
        }

        // A non-`Permission`/`OwnerDead` failure here means the mutex
        // itself is unusable; the list this node still links into can only
        // be fixed up under that same mutex, so there is nothing safe left
        // to do but stop rather than corrupt the list concurrently.
        if let Some(err) = self.mutex_ret.get() {
            if err != Errno::OwnerDead {
                cvfutex_lib::diag_warn!(
                    "cond unwait: mutex reacquire failed with {:?}, refusing to touch the \
                     detached list further; deadlocking",
                    err
                );
                loop {
                    core::hint::spin_loop();
                }
            }
        }

        // Wait for the signaling thread to hand the list over to mutex
        // protection.
        self.barrier.lock::<LinuxFutex>();

        if self.requeued.get() {
            self.mutex().note_requeued_waiter_undone();
        }

        // Find a still-listed, not-yet-requeued waiter to hand the
        // requeue role to, walking from the oldest end exactly as
        // `unwait()`'s two `if (p==node) p=node->prev;` special cases do:
        // once to skip past ourselves if we were the newest node, and
        // again after the `requeued` filter for the same reason.
        let self_ptr: *const Waiter = self;
        let mut p: *const Waiter = self_ptr;
        unsafe {
            while !(*p).next.get().is_null() {
                p = (*p).next.get();
            }
        }
        if core::ptr::eq(p, self_ptr) {
            p = self.prev.get();
        }
        unsafe {
            while !p.is_null() && (*p).requeued.get() {
                p = (*p).prev.get();
            }
        }
        if core::ptr::eq(p, self_ptr) {
            p = self.prev.get();
        }
        if !p.is_null() {
            let target = unsafe { &*p };
            target.requeued.set(true);
            self.mutex().note_requeued_waiter();
            // The kernel cannot requeue from a private futex to a shared
            // one; for a process-shared mutex the cv's own futex word is
            // still private, so fall back to a plain wake of the target.
            if self.mutex().is_shared() {
                sys::futex_wake(&target.state, 1, false);
            } else {
                sys::futex_requeue(&target.state, 0, 1, self.mutex().lock_word_ptr(), false);
            }
        }

        if !self.next.get().is_null() {
            unsafe { (*self.next.get()).prev.set(self.prev.get()) };
        }
        if !self.prev.get().is_null() {
            unsafe { (*self.prev.get()).next.set(self.next.get()) };
        }
    }
}

/// Bit pattern of musl's `-0x7fffffff` sentinel reinterpreted as `u32`,
/// compared against the pre-decrement waiter count for the process-shared
/// condvar teardown handshake. spec.md leaves the exact shared-cv
/// bookkeeping as an open question deferred to the original implementation;
/// this crate reproduces the sentinel bit-for-bit rather than inventing a
/// different one (see DESIGN.md).
pub(crate) const SHARED_SENTINEL: u32 = (-0x7fff_ffffi32) as u32;

// SAFETY: all fields are either atomics or `Cell`s guarded by the cv
// lock/barrier protocol; a `Waiter` is only ever shared across threads via
// raw pointers stored under that protocol, never via `&Waiter` aliasing.
unsafe impl Sync for Waiter {}

#[cfg(test)]
extern crate std;
