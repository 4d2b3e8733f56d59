//! Counting semaphore bounding concurrently active tasks.
//!
//! The bounded fan-out policy spawns a task per subdirectory and per
//! file, exactly like the unbounded one, but each task body first draws a
//! [`Ticket`] here before doing any work. At most `capacity` tickets
//! exist at once, so at most `capacity` tasks are ever active; the rest
//! sit parked in [`TaskLimiter::acquire`]. Tickets release on drop, so an
//! erroring or panicking task can never leak capacity.
//!
//! Tickets are deliberately acquired inside the spawned task rather than
//! by its parent: a parent task keeps its own ticket for the duration of
//! its directory scan, and blocking on a child's ticket while holding its
//! own would deadlock the moment every ticket holder did the same.

use std::sync::{Arc, Condvar, Mutex};

#[derive(Debug)]
struct LimiterState {
    /// Tickets currently free.
    available: usize,
    /// Highest number of tickets out at once.
    peak: usize,
}

/// Fixed-capacity ticket pool.
///
/// Shared across tasks behind an `Arc`; the live and peak gauges let
/// tests assert the capacity bound from outside.
#[derive(Debug)]
pub struct TaskLimiter {
    state: Mutex<LimiterState>,
    freed: Condvar,
    capacity: usize,
}

impl TaskLimiter {
    /// Create a limiter with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero, since no task could ever run.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "limiter capacity must be non-zero");
        Self {
            state: Mutex::new(LimiterState {
                available: capacity,
                peak: 0,
            }),
            freed: Condvar::new(),
            capacity,
        }
    }

    /// Draw a ticket, blocking while the pool is exhausted.
    ///
    /// The ticket returns to the pool when dropped.
    #[must_use]
    pub fn acquire(self: Arc<Self>) -> Ticket {
        {
            let mut state = self.state.lock().unwrap();
            while state.available == 0 {
                state = self.freed.wait(state).unwrap();
            }
            state.available -= 1;
            let live = self.capacity - state.available;
            state.peak = state.peak.max(live);
        }
        Ticket { limiter: self }
    }

    /// Return one ticket to the pool.
    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(state.available < self.capacity, "ticket released twice");
        state.available += 1;
        self.freed.notify_one();
    }

    /// The configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tickets currently held.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.capacity - self.state.lock().unwrap().available
    }

    /// Highest number of tickets held at once over the limiter's life.
    #[must_use]
    pub fn peak_in_use(&self) -> usize {
        self.state.lock().unwrap().peak
    }
}

/// RAII permit for one active task.
#[derive(Debug)]
pub struct Ticket {
    limiter: Arc<TaskLimiter>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.limiter.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_acquire_and_release() {
        let limiter = Arc::new(TaskLimiter::new(2));

        let t1 = Arc::clone(&limiter).acquire();
        let t2 = Arc::clone(&limiter).acquire();
        assert_eq!(limiter.in_use(), 2);

        drop(t1);
        assert_eq!(limiter.in_use(), 1);
        drop(t2);
        assert_eq!(limiter.in_use(), 0);
    }

    #[test]
    fn test_never_exceeds_capacity_under_contention() {
        let capacity = 3;
        let limiter = Arc::new(TaskLimiter::new(capacity));
        let active = Arc::new(AtomicUsize::new(0));
        let seen_over = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let active = Arc::clone(&active);
                let seen_over = Arc::clone(&seen_over);
                thread::spawn(move || {
                    let _ticket = limiter.acquire();
                    let live = active.fetch_add(1, Ordering::SeqCst) + 1;
                    if live > capacity {
                        seen_over.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_millis(5));
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(seen_over.load(Ordering::SeqCst), 0);
        assert!(limiter.peak_in_use() <= capacity);
        assert_eq!(limiter.in_use(), 0);
    }

    #[test]
    fn test_ticket_released_on_panic() {
        let limiter = Arc::new(TaskLimiter::new(1));

        let worker = Arc::clone(&limiter);
        let handle = thread::spawn(move || {
            let _ticket = worker.acquire();
            panic!("task failed");
        });
        assert!(handle.join().is_err());

        // The ticket came back despite the panic; this would hang otherwise.
        let _ticket = Arc::clone(&limiter).acquire();
        assert_eq!(limiter.in_use(), 1);
    }

    #[test]
    fn test_peak_records_high_water_mark() {
        let limiter = Arc::new(TaskLimiter::new(4));

        let t1 = Arc::clone(&limiter).acquire();
        let t2 = Arc::clone(&limiter).acquire();
        drop(t1);
        let t3 = Arc::clone(&limiter).acquire();
        drop(t2);
        drop(t3);

        assert_eq!(limiter.peak_in_use(), 2);
    }

    #[test]
    #[should_panic(expected = "limiter capacity must be non-zero")]
    fn test_zero_capacity_rejected() {
        let _ = TaskLimiter::new(0);
    }
}
