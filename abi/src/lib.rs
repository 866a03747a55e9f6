//! Shared ABI constants for the futex-backed condition variable.
//!
//! Single source of truth for the raw Linux x86_64 syscall numbers, futex
//! operation codes, clock ids and errno values that `cvfutex-core` issues
//! directly via inline assembly (see `cvfutex-core::sys::raw`). Having one
//! crate own these numbers keeps the syscall layer and the mutex/condvar
//! layer from drifting out of sync, the same role `slopos-abi` played
//! between kernel and userland in the teacher repo.
//!
//! All types here are `#[repr(C)]` where they cross the syscall boundary.

#![no_std]
#![forbid(unsafe_code)]

pub mod clock;
pub mod errno;
pub mod mutexattr;
pub mod syscall;

pub use clock::{ClockId, Timespec};
pub use errno::Errno;
pub use mutexattr::MutexType;
pub use syscall::*;
