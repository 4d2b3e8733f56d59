//! Synchronization primitives for the scan policies.
//!
//! # Overview
//!
//! Two small primitives coordinate the fan-out policies:
//!
//! - [`TaskCounter`] / [`TaskGuard`]: a completion barrier counting
//!   outstanding tasks. A task is registered *before* it is spawned, so
//!   the count can never dip to zero while work is still being handed
//!   off; the guard decrements on drop, covering every exit path.
//! - [`TaskLimiter`] / [`Ticket`]: a counting semaphore bounding how many
//!   tasks run at once. Acquiring blocks while the limiter is saturated;
//!   the ticket releases on drop, success or failure alike.
//!
//! Both are explicit objects handed to tasks by `Arc` handle, never
//! globals, so runs stay independent and the primitives testable in
//! isolation.

pub mod counter;
pub mod limiter;

pub use counter::{TaskCounter, TaskGuard};
pub use limiter::{TaskLimiter, Ticket};
