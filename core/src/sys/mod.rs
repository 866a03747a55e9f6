//! Thin syscall boundary: raw asm wrappers plus the handful of typed
//! wrappers the condvar/mutex engine actually calls.
//!
//! Grounded on the teacher's `userland/src/syscall` module split
//! (`raw.rs` for the asm, a typed layer on top) but collapsed to exactly
//! the three futex operations and two clock/id queries spec.md §6 names
//! as external interfaces — everything else SlopOS's syscall table
//! covered (file I/O, process control, graphics) has no counterpart here.

pub mod futex;
pub mod raw;

pub use futex::{clock_gettime, futex_requeue, futex_wait_bitset, futex_wake, gettid};

use core::sync::atomic::AtomicU32;
use cvfutex_abi::{ClockId, FUTEX_BITSET_MATCH_ANY};
use cvfutex_lib::FutexWord;

/// Wires `cvfutex_lib::SsdLock`'s generic futex hook to the real syscalls
/// in this crate, for the two private (never process-shared) SSD-locks a
/// condition variable owns: its own list lock and each waiter's barrier.
pub struct LinuxFutex;

impl FutexWord for LinuxFutex {
    fn wait(word: &AtomicU32, expected: u32) {
        let _ = futex::futex_wait_bitset(
            word,
            expected,
            None,
            ClockId::Monotonic,
            FUTEX_BITSET_MATCH_ANY,
            false,
        );
    }

    fn wake(word: &AtomicU32, count: u32) {
        futex::futex_wake(word, count, false);
    }
}
