//! Futex-backed condition variable and mutex: the syscall layer (`sys`)
//! plus the protocol engine built on top of it (`sync`).
//!
//! `#![no_std]` like the rest of the workspace; the only host dependency is
//! the raw `syscall` instruction, issued directly rather than through libc
//! (see SPEC_FULL.md AMBIENT-0 for why this targets the real Linux futex
//! implementation instead of a bespoke one).

#![no_std]

pub mod sync;
pub mod sys;

pub use sync::{Condvar, Mutex, Waiter};
