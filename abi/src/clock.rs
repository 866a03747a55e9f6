//! Clock selection and timestamp types shared by the syscall layer.

/// Which clock a deadline is measured against. Carried by the condition
/// variable at construction time, per spec.md §3 ("we assume the CV carries
/// a clock id and a shared-or-private flag").
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockId {
    /// `CLOCK_MONOTONIC`: unaffected by wall-clock adjustments. Default for
    /// `pthread_cond_t` on Linux/glibc.
    Monotonic = 0,
    /// `CLOCK_REALTIME`: wall-clock time; selected via
    /// `pthread_condattr_setclock`.
    Realtime = 1,
}

impl ClockId {
    /// The `clockid_t` value `clock_gettime(2)` expects.
    #[inline]
    pub const fn raw(self) -> u64 {
        match self {
            ClockId::Realtime => 0,
            ClockId::Monotonic => 1,
        }
    }
}

/// `struct timespec` for the syscall boundary: seconds plus nanoseconds.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

impl Timespec {
    pub const ZERO: Timespec = Timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };

    /// `true` if `tv_nsec` is outside `[0, 1_000_000_000)`.
    ///
    /// Mirrors spec.md §4.3's precondition: a malformed deadline returns
    /// `INVALID` before the CV is touched.
    #[inline]
    pub const fn is_malformed(&self) -> bool {
        self.tv_nsec < 0 || self.tv_nsec >= 1_000_000_000
    }

    #[inline]
    pub const fn as_nanos(&self) -> i128 {
        self.tv_sec as i128 * 1_000_000_000 + self.tv_nsec as i128
    }

    /// Deadline relative to `now`, saturating at zero if already past.
    #[inline]
    pub fn saturating_sub(&self, now: Timespec) -> Timespec {
        let diff = self.as_nanos() - now.as_nanos();
        if diff <= 0 {
            return Timespec::ZERO;
        }
        Timespec {
            tv_sec: (diff / 1_000_000_000) as i64,
            tv_nsec: (diff % 1_000_000_000) as i64,
        }
    }
}
