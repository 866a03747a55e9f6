//! End-to-end scenario tests exercising the condvar/mutex engine the way
//! spec.md §8 describes them: real `std::thread`s, real Linux futex
//! syscalls (via `cvfutex_core`/`cvfutex_userland`), no mocking of the
//! syscall layer. Kept as its own workspace member, the same role
//! `slopos-tests` played for the teacher's in-kernel suite registry, but
//! built on ordinary `cargo test` rather than a bespoke panic-catching
//! harness — there is no kernel here to protect from a failing suite.

pub mod harness;

#[cfg(test)]
mod property_tests;

#[cfg(test)]
mod scenario_tests {
    use cvfutex_abi::{ClockId, Errno, MutexType, Timespec};
    use cvfutex_core::{Condvar, Mutex};
    use cvfutex_userland::{Condvar as UCondvar, Mutex as UMutex};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// Scenario 1: thread A holds M, waits; thread B signals and unlocks.
    /// A must return holding M.
    #[test]
    fn single_signal_wakes_one_waiter() {
        let mutex = Arc::new(Mutex::new(MutexType::NORMAL));
        let cond = Arc::new(Condvar::new(ClockId::Monotonic));

        let (m_a, c_a) = (mutex.clone(), cond.clone());
        let a = thread::spawn(move || {
            m_a.lock().unwrap();
            c_a.timed_wait(&m_a, None).unwrap();
            assert_eq!(m_a.owner(), cvfutex_core::sys::gettid());
            m_a.unlock().unwrap();
        });
        thread::sleep(Duration::from_millis(20));
        mutex.lock().unwrap();
        cond.signal(1).unwrap();
        mutex.unlock().unwrap();
        a.join().unwrap();
    }

    /// Scenario 2: a wait with a deadline and no signaler times out at or
    /// after the deadline, still holding the mutex.
    #[test]
    fn timeout_with_no_signal() {
        let mutex = Mutex::new(MutexType::NORMAL);
        let cond = Condvar::new(ClockId::Monotonic);

        mutex.lock().unwrap();
        let now = cvfutex_core::sys::clock_gettime(ClockId::Monotonic);
        let nanos = now.as_nanos() + 10_000_000;
        let deadline = Timespec {
            tv_sec: (nanos / 1_000_000_000) as i64,
            tv_nsec: (nanos % 1_000_000_000) as i64,
        };
        let started = std::time::Instant::now();
        let res = cond.timed_wait(&mutex, Some(deadline));
        assert_eq!(res, Err(Errno::Timeout));
        assert!(started.elapsed() >= Duration::from_millis(10));
        assert_eq!(mutex.owner(), cvfutex_core::sys::gettid());
        mutex.unlock().unwrap();
    }

    /// Scenario 3: three waiters, one broadcast; all three eventually hold
    /// and release the mutex exactly once.
    #[test]
    fn broadcast_wakes_three_waiters_in_turn() {
        let mutex = Arc::new(UMutex::new(0u32));
        let cond = Arc::new(UCondvar::new());
        let mut handles = Vec::new();

        for _ in 0..3 {
            let m = mutex.clone();
            let c = cond.clone();
            handles.push(thread::spawn(move || {
                let mut guard = m.lock().unwrap();
                while *guard == 0 {
                    guard = c.wait(guard).unwrap();
                }
                *guard += 1;
            }));
        }

        thread::sleep(Duration::from_millis(30));
        {
            let mut guard = mutex.lock().unwrap();
            *guard = 1;
        }
        cond.notify_all().unwrap();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*mutex.lock().unwrap(), 4);
    }

    /// *No-waiter signal is a no-op*: signaling an empty cv must not panic
    /// or block.
    #[test]
    fn signal_on_empty_cv_is_noop() {
        let cond = Condvar::new(ClockId::Monotonic);
        cond.signal(1).unwrap();
        cond.broadcast().unwrap();
    }

    /// Scenario 6: calling `timed_wait` with an error-checking mutex the
    /// caller does not own must return `Permission` without touching the cv.
    #[test]
    fn wrong_owner_on_errorcheck_mutex_returns_permission() {
        let mutex = Arc::new(Mutex::new(MutexType::ERRORCHECK));
        let cond = Condvar::new(ClockId::Monotonic);

        // Another thread locks the mutex; this thread never acquired it.
        let m2 = mutex.clone();
        let locker = thread::spawn(move || {
            m2.lock().unwrap();
            thread::sleep(Duration::from_millis(30));
            m2.unlock().unwrap();
        });
        thread::sleep(Duration::from_millis(10));
        let res = cond.timed_wait(&mutex, None);
        assert_eq!(res, Err(Errno::Permission));
        locker.join().unwrap();
    }

    /// *Requeue accounting*: after a broadcast hands waiters off to the
    /// mutex via requeue, `mutex.waiters` settles back to zero once every
    /// woken thread has reacquired and released the mutex.
    #[test]
    fn requeue_accounting_settles_to_zero() {
        let mutex = Arc::new(Mutex::new(MutexType::NORMAL));
        let cond = Arc::new(Condvar::new(ClockId::Monotonic));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let m = mutex.clone();
            let c = cond.clone();
            handles.push(thread::spawn(move || {
                m.lock().unwrap();
                c.timed_wait(&m, None).unwrap();
                m.unlock().unwrap();
            }));
        }
        thread::sleep(Duration::from_millis(30));
        mutex.lock().unwrap();
        cond.broadcast().unwrap();
        mutex.unlock().unwrap();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(mutex.waiters(), 0);
    }

    /// Scenario 4: a waiter's deadline and a concurrent `signal(1)` racing
    /// to claim it. Whichever wins, the result is self-consistent: either
    /// the waiter returns `Ok(())` (signaled) or `Timeout` (the signal
    /// found it already `LEAVING` and moved on / became a no-op), never a
    /// hang and never both. Run many short-deadline rounds back-to-back so
    /// the race is actually exercised in both directions, not just one.
    #[test]
    fn timeout_races_signal_without_hanging_or_double_delivery() {
        let mutex = Arc::new(Mutex::new(MutexType::NORMAL));
        let cond = Arc::new(Condvar::new(ClockId::Monotonic));

        for _ in 0..200 {
            let (m_a, c_a) = (mutex.clone(), cond.clone());
            let a = thread::spawn(move || {
                m_a.lock().unwrap();
                let now = cvfutex_core::sys::clock_gettime(ClockId::Monotonic);
                let nanos = now.as_nanos() + 200_000;
                let deadline = Timespec {
                    tv_sec: (nanos / 1_000_000_000) as i64,
                    tv_nsec: (nanos % 1_000_000_000) as i64,
                };
                let res = c_a.timed_wait(&m_a, Some(deadline));
                assert_eq!(m_a.owner(), cvfutex_core::sys::gettid());
                m_a.unlock().unwrap();
                res
            });

            // No synchronization with `a` beyond the mutex itself: this
            // signal may land before insertion, during the wait, or after
            // the waiter has already timed out and left. All three are
            // legal per spec.md's timeout-race property.
            mutex.lock().unwrap();
            let _ = cond.signal(1);
            mutex.unlock().unwrap();

            let res = a.join().unwrap();
            assert!(matches!(res, Ok(()) | Err(Errno::Timeout)));
        }
    }

    /// A malformed deadline is rejected before the cv is touched, per
    /// spec.md §4.3's precondition.
    #[test]
    fn malformed_deadline_is_rejected() {
        let mutex = Mutex::new(MutexType::NORMAL);
        let cond = Condvar::new(ClockId::Monotonic);
        mutex.lock().unwrap();
        let res = cond.timed_wait(
            &mutex,
            Some(Timespec {
                tv_sec: 0,
                tv_nsec: 2_000_000_000,
            }),
        );
        assert_eq!(res, Err(Errno::Invalid));
        mutex.unlock().unwrap();
    }
}
