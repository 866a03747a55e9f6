//! Typed wrappers around the three futex operations spec.md §6 names as
//! external interfaces, plus `clock_gettime`/`gettid`.
//!
//! Each function owns the one `unsafe` call into `sys::raw` its operation
//! needs; everything above this module (`sync::*`) is safe code working
//! purely in terms of `AtomicU32`/`Result`.

use core::sync::atomic::AtomicU32;

use cvfutex_abi::{
    ClockId, Errno, Timespec, ERRNO_ETIMEDOUT, FUTEX_PRIVATE_FLAG, FUTEX_REQUEUE,
    FUTEX_WAIT_BITSET, FUTEX_WAKE, SYS_CLOCK_GETTIME, SYS_FUTEX, SYS_GETTID,
};

use super::raw;

fn private_flag(shared: bool) -> u64 {
    if shared {
        0
    } else {
        FUTEX_PRIVATE_FLAG
    }
}

/// Block while `word.load() == expected`, until woken by a matching
/// `futex_wake`/`futex_requeue`, or `deadline` (absolute, against `clock`)
/// elapses. `bitset` restricts which wakes this call matches; pass
/// `FUTEX_BITSET_MATCH_ANY` for the common case.
///
/// Returns `Err(Errno::Timeout)` if the deadline elapsed. A spurious return
/// (the word no longer matches `expected`, or an `EINTR`) is reported as
/// `Ok(())` — callers re-check their own predicate, exactly as
/// `pthread_cond_timedwait` expects of its `__timedwait` collaborator.
pub fn futex_wait_bitset(
    word: &AtomicU32,
    expected: u32,
    deadline: Option<&Timespec>,
    clock: ClockId,
    bitset: u32,
    shared: bool,
) -> Result<(), Errno> {
    let mut op = FUTEX_WAIT_BITSET | private_flag(shared);
    if matches!(clock, ClockId::Realtime) {
        op |= cvfutex_abi::FUTEX_CLOCK_REALTIME;
    }
    let ts_ptr = match deadline {
        Some(ts) => ts as *const Timespec as u64,
        None => 0,
    };
    let ret = unsafe {
        raw::syscall6(
            SYS_FUTEX,
            word as *const AtomicU32 as u64,
            op,
            expected as u64,
            ts_ptr,
            0,
            bitset as u64,
        )
    };
    if ret == ERRNO_ETIMEDOUT {
        return Err(Errno::Timeout);
    }
    // EAGAIN (word already changed) and EINTR are both treated as a benign
    // wakeup: the caller re-evaluates its own state machine.
    Ok(())
}

/// Wake up to `count` waiters blocked on `word`. Returns the number
/// actually woken.
pub fn futex_wake(word: &AtomicU32, count: u32, shared: bool) -> u32 {
    let ret = unsafe {
        raw::syscall4(
            SYS_FUTEX,
            word as *const AtomicU32 as u64,
            FUTEX_WAKE | private_flag(shared),
            count as u64,
            0,
        )
    };
    if ret < 0 {
        0
    } else {
        ret as u32
    }
}

/// Wake up to `wake_count` waiters on `word`, and move up to
/// `requeue_count` of the rest onto `target` without waking them. Returns
/// the total number of waiters the kernel touched (woken plus requeued).
pub fn futex_requeue(
    word: &AtomicU32,
    wake_count: u32,
    requeue_count: u32,
    target: &AtomicU32,
    shared: bool,
) -> u32 {
    let ret = unsafe {
        raw::syscall6(
            SYS_FUTEX,
            word as *const AtomicU32 as u64,
            FUTEX_REQUEUE | private_flag(shared),
            wake_count as u64,
            requeue_count as u64,
            target as *const AtomicU32 as u64,
            0,
        )
    };
    if ret < 0 {
        0
    } else {
        ret as u32
    }
}

/// The calling thread's kernel id, used as the SSD-lock-free identity for
/// error-checking mutex ownership.
pub fn gettid() -> u32 {
    let ret = unsafe { raw::syscall1(SYS_GETTID, 0) };
    ret as u32
}

/// Current time on `clock`. Used to turn spec.md §4.3's relative-vs-absolute
/// question into an absolute deadline before the first `futex_wait_bitset`.
pub fn clock_gettime(clock: ClockId) -> Timespec {
    let mut ts = Timespec::ZERO;
    let _ = unsafe {
        raw::syscall2(
            SYS_CLOCK_GETTIME,
            clock.raw(),
            &mut ts as *mut Timespec as u64,
        )
    };
    ts
}
