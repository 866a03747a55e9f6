//! Diagnostics funnel: all log output goes through a single swappable
//! backend function pointer, the same shape as the teacher's
//! `klog_register_backend` (`lib/src/klog.rs`) — one registration point, no
//! external `log`-crate dependency, consistent with the rest of the
//! workspace's minimal dependency set.
//!
//! # Backend contract
//!
//! The backend receives the already-formatted line (without trailing
//! newline) for a single log event and must write it atomically with
//! respect to other callers.
//!
//! Used sparingly by `cvfutex-core`: one trace per `signal` detach-N call,
//! one warning on the path-B deadlock fallback (spec.md §7's fatal
//! condition).

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagLevel {
    Error = 0,
    Warn = 1,
    Trace = 2,
}

type BackendFn = fn(DiagLevel, fmt::Arguments);

static BACKEND: AtomicPtr<()> = AtomicPtr::new(default_backend as *mut ());
static MAX_LEVEL: AtomicU8 = AtomicU8::new(DiagLevel::Warn as u8);

fn default_backend(_level: DiagLevel, _args: fmt::Arguments) {
    // No-op until an embedder registers a real sink (a console writer, a
    // ring buffer, whatever the host program wants). Matches the teacher's
    // early-boot fallback in spirit: never panics, never blocks.
}

/// Install the diagnostics sink. Call once at program start.
pub fn register_backend(backend: BackendFn) {
    BACKEND.store(backend as *mut (), Ordering::Release);
}

/// Set the maximum level that reaches the backend; anything more verbose
/// than `level` is dropped before formatting.
pub fn set_max_level(level: DiagLevel) {
    MAX_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[doc(hidden)]
pub fn dispatch(level: DiagLevel, args: fmt::Arguments) {
    if (level as u8) > MAX_LEVEL.load(Ordering::Relaxed) {
        return;
    }
    let ptr = BACKEND.load(Ordering::Acquire);
    // SAFETY: only ever stores a `BackendFn`-typed function pointer via
    // `register_backend`, default included.
    let backend: BackendFn = unsafe { core::mem::transmute(ptr) };
    backend(level, args);
}

#[macro_export]
macro_rules! diag_error {
    ($($arg:tt)*) => {
        $crate::diag::dispatch($crate::diag::DiagLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! diag_warn {
    ($($arg:tt)*) => {
        $crate::diag::dispatch($crate::diag::DiagLevel::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! diag_trace {
    ($($arg:tt)*) => {
        $crate::diag::dispatch($crate::diag::DiagLevel::Trace, format_args!($($arg)*))
    };
}
