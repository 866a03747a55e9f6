//! Low-level, syscall-free primitives shared by `cvfutex-core` and
//! `cvfutex-userland`: the self-synchronized-destruction lock, one-time
//! initialization, and the diagnostics funnel.
//!
//! Kept deliberately syscall-free (see [`ssd_lock::FutexWord`]) so this
//! crate has no dependency on the raw syscall layer that lives in
//! `cvfutex-core::sys` — the same leaf-crate role `slopos-lib` played in
//! the teacher workspace.

#![no_std]

pub mod diag;
pub mod once_lock;
pub mod ssd_lock;

pub use once_lock::OnceLock;
pub use ssd_lock::{FutexWord, SsdLock};
