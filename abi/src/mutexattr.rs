//! Mutex type bitfield, per spec.md §3: "a type bitfield whose bit 7 marks
//! process-shared". Low nibble selects the locking discipline, following the
//! musl/glibc convention (`type & 15`) referenced by
//! `original_source/pthread_cond_timedwait.c`'s own `m->_m_type & 15` check.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MutexType: u8 {
        /// Plain mutex: no ownership check, `timed_wait` never returns
        /// `PERMISSION` for this kind.
        const NORMAL = 0;
        /// Deadlocks are reported rather than re-entered (not used by this
        /// crate beyond the bit's presence — recursion is out of scope).
        const RECURSIVE = 1;
        /// Ownership is tracked; a non-owner calling `timed_wait` gets
        /// `Errno::Permission` without touching the CV (spec.md §4.3).
        const ERRORCHECK = 2;
        /// Bit 7: process-shared rather than process-private.
        const SHARED = 0x80;
    }
}

impl MutexType {
    /// The locking-discipline nibble, ignoring `SHARED`.
    #[inline]
    pub const fn kind(self) -> MutexType {
        MutexType::from_bits_truncate(self.bits() & 0x0f)
    }

    #[inline]
    pub const fn is_shared(self) -> bool {
        self.contains(MutexType::SHARED)
    }

    #[inline]
    pub const fn is_error_checking(self) -> bool {
        self.kind().contains(MutexType::ERRORCHECK)
    }

    #[inline]
    pub const fn is_recursive(self) -> bool {
        self.kind().contains(MutexType::RECURSIVE)
    }
}
