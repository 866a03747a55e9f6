//! Raw Linux x86_64 syscall numbers and futex operation codes.
//!
//! This module is the single source of truth for the syscall numbers the
//! `sys::raw` layer issues. Numbers are the real Linux x86_64 values (not
//! SlopOS's fictional table) — see `SPEC_FULL.md` AMBIENT-0 for why this
//! crate targets the real kernel's futex implementation directly rather
//! than a bespoke one.

// =============================================================================
// Syscall numbers (Linux x86_64)
// =============================================================================

pub const SYS_FUTEX: u64 = 202;
pub const SYS_CLOCK_GETTIME: u64 = 228;
pub const SYS_GETTID: u64 = 186;

// =============================================================================
// Futex operations
// =============================================================================

/// Wait until `*uaddr == val`, or `FUTEX_WAKE`d, or `timeout` elapses.
pub const FUTEX_WAIT: u64 = 0;
/// Wake up to `val` waiters blocked on `uaddr`.
pub const FUTEX_WAKE: u64 = 1;
/// Move waiters from `uaddr` to `uaddr2` without waking them.
pub const FUTEX_REQUEUE: u64 = 3;
/// `FUTEX_WAIT` variant that takes an absolute deadline and a 32-bit bitset.
pub const FUTEX_WAIT_BITSET: u64 = 9;

/// This process's waiters only; never visible to other processes.
pub const FUTEX_PRIVATE_FLAG: u64 = 128;
/// Interpret the deadline passed to `FUTEX_WAIT_BITSET` against
/// `CLOCK_REALTIME` instead of the default `CLOCK_MONOTONIC`.
pub const FUTEX_CLOCK_REALTIME: u64 = 256;

/// Matches any waiter regardless of the bitset it was woken with.
pub const FUTEX_BITSET_MATCH_ANY: u32 = u32::MAX;

// =============================================================================
// Errno (negative return convention: raw syscall returns `-errno`)
// =============================================================================

pub const ERRNO_EINTR: i64 = -4;
pub const ERRNO_EAGAIN: i64 = -11;
pub const ERRNO_EINVAL: i64 = -22;
pub const ERRNO_ETIMEDOUT: i64 = -110;
pub const ERRNO_EPERM: i64 = -1;
pub const ERRNO_EOWNERDEAD: i64 = -130;
