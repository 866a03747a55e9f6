//! Property checks expressed with the [`crate::harness`] `TestResult`
//! harness rather than plain panicking asserts — the two spec.md §8 laws
//! that read most naturally as a pass/fail check over observed state:
//! *no-waiter signal is a no-op* and *requeue accounting*.

use crate::harness::{run_property, TestResult};
use crate::{assert_eq_test, assert_test};
use cvfutex_abi::{ClockId, MutexType};
use cvfutex_core::{Condvar, Mutex};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn no_waiter_signal_is_noop() -> TestResult {
    let cond = Condvar::new(ClockId::Monotonic);
    assert_test!(cond.signal(1).is_ok());
    assert_test!(cond.broadcast().is_ok());
    TestResult::Pass
}

fn requeue_accounting_settles_to_zero() -> TestResult {
    let mutex = Arc::new(Mutex::new(MutexType::NORMAL));
    let cond = Arc::new(Condvar::new(ClockId::Monotonic));
    let mut handles = Vec::new();

    for _ in 0..5 {
        let m = mutex.clone();
        let c = cond.clone();
        handles.push(thread::spawn(move || {
            m.lock().unwrap();
            c.timed_wait(&m, None).unwrap();
            m.unlock().unwrap();
        }));
    }
    thread::sleep(Duration::from_millis(30));
    assert_test!(mutex.lock().is_ok());
    assert_test!(cond.broadcast().is_ok());
    assert_test!(mutex.unlock().is_ok());
    for h in handles {
        assert_test!(h.join().is_ok());
    }
    assert_eq_test!(mutex.waiters(), 0);
    TestResult::Pass
}

#[test]
fn property_no_waiter_signal_is_noop() {
    run_property("no_waiter_signal_is_noop", no_waiter_signal_is_noop);
}

#[test]
fn property_requeue_accounting_settles_to_zero() {
    run_property(
        "requeue_accounting_settles_to_zero",
        requeue_accounting_settles_to_zero,
    );
}
