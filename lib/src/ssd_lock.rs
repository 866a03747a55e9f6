//! Self-synchronized destruction lock (SSD-lock).
//!
//! A two-op lock over a three-state word (`0` = free, `1` = held with no
//! waiters, `2` = held with waiters) whose `unlock` performs exactly one
//! atomic write and, at most, one futex wake — and never reads the word
//! afterward. That last property is the whole point: a caller may unlock a
//! node whose storage is reclaimed the instant the call returns (spec.md
//! §4.1), because `unlock` never dereferences `self` again once the swap
//! lands.
//!
//! Ported from the `lock`/`unlock` pair in
//! `original_source/pthread_cond_timedwait.c`:
//!
//! ```c
//! static inline void lock(volatile int *l) {
//!     if (a_cas(l, 0, 1)) {
//!         a_cas(l, 1, 2);
//!         do __wait(l, 0, 2, 1);
//!         while (a_cas(l, 0, 2));
//!     }
//! }
//! static inline void unlock(volatile int *l) {
//!     if (a_swap(l, 0)==2) __wake(l, 1, 1);
//! }
//! ```
//!
//! This is used both as the condition variable's own list lock (spec.md
//! §3's `lock` field) and as each waiter node's `barrier` (§3's `barrier`
//! field) — two distinct uses of the same small primitive, matching the
//! teacher's practice of sharing one lock type (`IrqMutex`) across very
//! different call sites rather than growing a bespoke lock per use.

use core::sync::atomic::{AtomicU32, Ordering};

const FREE: u32 = 0;
const HELD: u32 = 1;
const HELD_CONTENDED: u32 = 2;

/// Hook into the platform's futex wait/wake. The SSD-lock is generic over
/// this so `cvfutex-lib` stays syscall-free and `#![no_std]` without a
/// dependency cycle back onto `cvfutex-core`, which is the crate that
/// actually owns the raw syscall wrappers.
pub trait FutexWord {
    /// Block while `*word == expected`. May return spuriously.
    fn wait(word: &AtomicU32, expected: u32);
    /// Wake up to `count` waiters blocked on `word`.
    fn wake(word: &AtomicU32, count: u32);
}

/// A self-synchronized-destruction-safe lock.
#[derive(Debug, Default)]
pub struct SsdLock {
    state: AtomicU32,
}

impl SsdLock {
    #[inline]
    pub const fn new() -> Self {
        Self {
            state: AtomicU32::new(FREE),
        }
    }

    /// Construct already held (used for a freshly inserted waiter's
    /// `barrier`, which starts locked until the signaler releases it).
    #[inline]
    pub const fn new_held() -> Self {
        Self {
            state: AtomicU32::new(HELD),
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state.load(Ordering::Acquire) != FREE
    }

    /// Acquire the lock, blocking via `F::wait` while contended.
    pub fn lock<F: FutexWord>(&self) {
        // CAS 0 -> 1: uncontended fast path.
        if self
            .state
            .compare_exchange(FREE, HELD, Ordering::Acquire, Ordering::Acquire)
            .is_ok()
        {
            return;
        }
        loop {
            // Mark contended (1 -> 2); if the holder already unlocked
            // (state no longer 1) this CAS simply fails and we retry below.
            let _ = self.state.compare_exchange(
                HELD,
                HELD_CONTENDED,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
            F::wait(&self.state, HELD_CONTENDED);
            // Try to take the lock directly into the contended state so a
            // concurrent unlocker knows to wake the next waiter.
            if self
                .state
                .compare_exchange(
                    FREE,
                    HELD_CONTENDED,
                    Ordering::Acquire,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return;
            }
        }
    }

    /// Release the lock. Performs exactly one atomic write and, if the lock
    /// was contended, exactly one wake — no read of `self` after the swap.
    pub fn unlock<F: FutexWord>(&self) {
        if self.state.swap(FREE, Ordering::Release) == HELD_CONTENDED {
            F::wake(&self.state, 1);
        }
    }
}

// SAFETY: all mutation goes through the atomic `state` word; the lock is
// safe to share across threads by construction.
unsafe impl Sync for SsdLock {}
unsafe impl Send for SsdLock {}

#[cfg(test)]
extern crate std;
