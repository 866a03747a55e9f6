//! The condvar/mutex protocol engine: spec.md's [MODULE] blocks translated
//! into one Rust module per musl source concept (`mutex`, `waiter`,
//! `condvar`, and the `guard` RAII stand-in for cancellation cleanup).

mod condvar;
mod guard;
mod mutex;
mod waiter;

pub use condvar::Condvar;
pub use mutex::Mutex;
pub use waiter::Waiter;
