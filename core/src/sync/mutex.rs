//! The mutex half of the condvar/mutex pair, grounded on the `_m_lock`
//! and `_m_waiters` fields `pthread_cond_timedwait.c` reads and writes but
//! does not itself define — this module supplies the collaborator contract
//! spec.md §6 leaves as an interface.
//!
//! Lock word layout, matching musl's `pthread_mutex_t::_m_lock`: the low
//! 30 bits hold the owning thread's tid (0 when unlocked), bit 31
//! (`HAS_WAITERS`) is set whenever a thread is or might be blocked in
//! `futex_wait_bitset` on this word. Recursion count and error-checking
//! ownership tracking live alongside for `MutexType::Recursive` /
//! `MutexType::ErrorCheck`.

use core::sync::atomic::{AtomicU32, Ordering};

use cvfutex_abi::{ClockId, Errno, MutexType};

use crate::sys;

const HAS_WAITERS: u32 = 1 << 31;
const TID_MASK: u32 = !HAS_WAITERS;

pub struct Mutex {
    lock_word: AtomicU32,
    /// Count of threads parked on `lock_word` via `futex_requeue` from a
    /// condition variable, separate from ordinary contenders spinning on
    /// the word directly. Read by [`crate::sync::condvar`]'s `unwait` to
    /// balance the count it bumped when it requeued a waiter here.
    pub(crate) waiters: AtomicU32,
    kind: MutexType,
    shared: bool,
    recursion: core::cell::Cell<u32>,
}

// SAFETY: `recursion` is only ever touched by the owning thread (the
// mutex's own `lock_word` CAS guarantees exclusivity before any read).
unsafe impl Sync for Mutex {}

impl Mutex {
    pub const fn new(kind: MutexType) -> Self {
        Self {
            lock_word: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
            shared: false,
            recursion: core::cell::Cell::new(0),
            kind,
        }
    }

    pub const fn new_shared(kind: MutexType) -> Self {
        Self {
            lock_word: AtomicU32::new(0),
            waiters: AtomicU32::new(0),
            shared: true,
            recursion: core::cell::Cell::new(0),
            kind,
        }
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    #[inline]
    pub fn mtype(&self) -> MutexType {
        self.kind
    }

    /// Owning thread's tid, or `0` if unlocked.
    #[inline]
    pub fn owner(&self) -> u32 {
        self.lock_word.load(Ordering::Acquire) & TID_MASK
    }

    /// Count of waiters parked here by a condition variable's requeue path.
    /// Exposed for the *requeue accounting* property in spec.md §8.
    #[inline]
    pub fn waiters(&self) -> u32 {
        self.waiters.load(Ordering::Acquire)
    }

    pub fn lock(&self) -> Result<(), Errno> {
        let tid = sys::gettid();
        if self.kind.is_recursive() && self.owner() == tid {
            self.recursion.set(self.recursion.get() + 1);
            return Ok(());
        }
        loop {
            match self.lock_word.compare_exchange(
                0,
                tid,
                Ordering::Acquire,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(_) => {
                    let cur = self.lock_word.load(Ordering::Acquire);
                    let owner = cur & TID_MASK;
                    if cur & HAS_WAITERS == 0 {
                        let _ = self.lock_word.compare_exchange(
                            owner,
                            owner | HAS_WAITERS,
                            Ordering::AcqRel,
                            Ordering::Acquire,
                        );
                    }
                    sys::futex_wait_bitset(
                        &self.lock_word,
                        owner | HAS_WAITERS,
                        None,
                        ClockId::Monotonic,
                        u32::MAX,
                        self.shared,
                    )?;
                }
            }
        }
    }

    pub fn try_lock(&self) -> Result<bool, Errno> {
        let tid = sys::gettid();
        if self.kind.is_recursive() && self.owner() == tid {
            self.recursion.set(self.recursion.get() + 1);
            return Ok(true);
        }
        Ok(self
            .lock_word
            .compare_exchange(0, tid, Ordering::Acquire, Ordering::Relaxed)
            .is_ok())
    }

    pub fn unlock(&self) -> Result<(), Errno> {
        let tid = sys::gettid();
        if self.kind.is_error_checking() && self.owner() != tid {
            return Err(Errno::Permission);
        }
        if self.kind.is_recursive() && self.recursion.get() > 0 {
            self.recursion.set(self.recursion.get() - 1);
            return Ok(());
        }
        let prev = self.lock_word.swap(0, Ordering::Release);
        if prev & HAS_WAITERS != 0 || self.waiters.load(Ordering::Acquire) > 0 {
            sys::futex_wake(&self.lock_word, 1, self.shared);
        }
        Ok(())
    }

    /// The condvar's `unwait` requeue path reaches this to add the extra
    /// waiter it parked here via `futex_requeue`.
    pub(crate) fn note_requeued_waiter(&self) {
        self.waiters.fetch_add(1, Ordering::AcqRel);
        self.lock_word.fetch_or(HAS_WAITERS, Ordering::AcqRel);
    }

    pub(crate) fn note_requeued_waiter_undone(&self) {
        self.waiters.fetch_sub(1, Ordering::AcqRel);
    }

    pub(crate) fn lock_word_ptr(&self) -> &AtomicU32 {
        &self.lock_word
    }
}

#[cfg(test)]
extern crate std;
