//! Completion tracker
//!
//! Counting synchronization handle shared between the orchestrator and the
//! matching worker. The orchestrator registers the units it expects with
//! [`CompletionTracker::add`]; the engine signals [`CompletionTracker::done`]
//! once per processed transaction. Resting orders never signal.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct CompletionTracker {
    pending: Mutex<usize>,
    drained: Condvar,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `units` outstanding completions.
    pub fn add(&self, units: usize) {
        let mut pending = self.pending.lock();
        *pending += units;
    }

    /// Signals one completed unit and wakes waiters when the count hits zero.
    ///
    /// A signal with nothing registered is logged and ignored.
    pub fn done(&self) {
        let mut pending = self.pending.lock();
        if *pending == 0 {
            tracing::warn!("completion signalled with no pending units registered");
            return;
        }
        *pending -= 1;
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    pub fn pending(&self) -> usize {
        *self.pending.lock()
    }

    /// Blocks until every registered unit has completed.
    pub fn wait(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.drained.wait(&mut pending);
        }
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout` in total.
    /// Returns `true` if the count drained in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.pending.lock();
        while *pending > 0 {
            if self.drained.wait_until(&mut pending, deadline).timed_out() {
                return *pending == 0;
            }
        }
        true
    }
}
