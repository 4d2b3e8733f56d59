//! Completion barrier for spawned scan tasks.
//!
//! Tracks how many traversal and hashing tasks are outstanding so the run
//! coordinator knows when the tree is fully processed. The discipline
//! mirrors a wait-group: the *spawning* task registers the new task
//! before the spawn happens, and the spawned task's [`TaskGuard`]
//! decrements when it drops. Registering before spawning means the count
//! only reaches zero once no task is running and none is being handed
//! off.

use std::sync::{Arc, Condvar, Mutex};

#[derive(Debug, Default)]
struct CounterState {
    /// Tasks registered but not yet finished.
    outstanding: usize,
    /// Highest value `outstanding` has reached.
    peak: usize,
}

/// Counts outstanding tasks and wakes waiters when none remain.
///
/// Shared across tasks behind an `Arc`; owned by the run coordinator.
#[derive(Debug, Default)]
pub struct TaskCounter {
    state: Mutex<CounterState>,
    zero: Condvar,
}

impl TaskCounter {
    /// Create a counter with no outstanding tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `n` tasks. Called by the spawning task before the spawn.
    pub fn add(&self, n: usize) {
        let mut state = self.state.lock().unwrap();
        state.outstanding += n;
        state.peak = state.peak.max(state.outstanding);
    }

    /// Mark one task finished, waking waiters if it was the last.
    pub fn done(&self) {
        let mut state = self.state.lock().unwrap();
        assert!(state.outstanding > 0, "done() without a matching add()");
        state.outstanding -= 1;
        if state.outstanding == 0 {
            self.zero.notify_all();
        }
    }

    /// Block until no tasks are outstanding.
    ///
    /// Returns immediately if nothing was ever registered.
    pub fn wait(&self) {
        let mut state = self.state.lock().unwrap();
        while state.outstanding > 0 {
            state = self.zero.wait(state).unwrap();
        }
    }

    /// Tasks currently outstanding.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.state.lock().unwrap().outstanding
    }

    /// Highest number of simultaneously outstanding tasks seen.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.state.lock().unwrap().peak
    }
}

/// RAII registration of one task with a [`TaskCounter`].
///
/// Created in the spawning task, moved into the spawned task, and dropped
/// when the task finishes. An unwinding task drops it too, so a panic
/// cannot strand the counter above zero.
#[derive(Debug)]
pub struct TaskGuard {
    counter: Arc<TaskCounter>,
}

impl TaskGuard {
    /// Register one task and return its guard.
    #[must_use]
    pub fn register(counter: &Arc<TaskCounter>) -> Self {
        counter.add(1);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.counter.done();
    }
}
