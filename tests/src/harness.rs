//! A small stand-in for the teacher's `TestResult`/`assert_eq_test!` harness
//! (`lib/src/testing/{mod,assertions}.rs`): a fallible test result plus
//! assertion macros that return `TestResult::Fail` instead of panicking.
//!
//! The teacher's own harness is wired to an in-kernel suite registry via
//! `#[link_section = ".test_registry"]`, which has no host-`cargo test`
//! counterpart; this module keeps the *shape* (property checks that report
//! a result value rather than unwinding) for the handful of assertions in
//! `property_tests` that read more naturally as property checks than as
//! panicking `#[test]`s, per SPEC_FULL.md's AMBIENT-4.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail,
}

impl TestResult {
    pub fn is_pass(self) -> bool {
        matches!(self, TestResult::Pass)
    }
}

/// Run a property-check function and panic with its failure message if it
/// reports `Fail`, so it still plugs into ordinary `#[test]` reporting.
pub fn run_property(name: &str, f: impl FnOnce() -> TestResult) {
    assert!(f().is_pass(), "property check {name} failed");
}

#[macro_export]
macro_rules! assert_eq_test {
    ($left:expr, $right:expr) => {{
        let left = $left;
        let right = $right;
        if left != right {
            std::eprintln!(
                "ASSERT_EQ: expected {:?}, got {:?} at {}:{}",
                right,
                left,
                file!(),
                line!()
            );
            return $crate::harness::TestResult::Fail;
        }
    }};
}

#[macro_export]
macro_rules! assert_test {
    ($cond:expr) => {{
        if !$cond {
            std::eprintln!("ASSERT: {} failed at {}:{}", stringify!($cond), file!(), line!());
            return $crate::harness::TestResult::Fail;
        }
    }};
}
