//! RAII stand-in for `pthread_cleanup_push(unwait, &node)`.
//!
//! POSIX threads support asynchronous cancellation of a blocked
//! `pthread_cond_timedwait`, which musl implements by pushing `unwait` as a
//! cleanup handler before blocking. Rust has no equivalent cancellation
//! primitive, so [`super::condvar::Condvar::timed_wait`] instead arms a
//! guard that runs the same `unwait` cleanup if the stack unwinds (a panic
//! in a signal handler substitute, or in test code) before the explicit
//! call on the normal path — see SPEC_FULL.md's cancellation-model note.

use super::waiter::Waiter;

pub struct WaitGuard<'a> {
    node: &'a Waiter,
    armed: bool,
}

impl<'a> WaitGuard<'a> {
    pub fn new(node: &'a Waiter) -> Self {
        Self { node, armed: true }
    }

    /// Disarm after the explicit `unwait` call on the normal path, so
    /// `Drop` does not run it a second time.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.node.unwait();
        }
    }
}
