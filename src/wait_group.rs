//! Counted completion barrier: register workers, block until all have left.

use std::sync::{Arc, Condvar, Mutex};

use tracing::trace;

/// Counts outstanding registrations; `wait` returns once the count is zero.
#[derive(Clone, Default)]
pub struct WaitGroup {
    inner: Arc<WaitGroupInner>,
}

#[derive(Default)]
struct WaitGroupInner {
    pending: Mutex<usize>,
    zero: Condvar,
}

/// Registration handle; signals completion exactly once when dropped.
pub struct Completion {
    inner: Arc<WaitGroupInner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one participant and return its completion handle.
    pub fn add(&self) -> Completion {
        let mut pending = self.inner.pending.lock().expect("wait group mutex poisoned");
        *pending += 1;
        trace!(pending = *pending, "registered");
        Completion {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Block until every registered participant has completed.
    pub fn wait(&self) {
        let mut pending = self.inner.pending.lock().expect("wait group mutex poisoned");
        while *pending > 0 {
            pending = self.inner.zero.wait(pending).expect("condvar wait failed");
        }
    }

    /// Participants that have not completed yet.
    pub fn pending(&self) -> usize {
        *self.inner.pending.lock().expect("wait group mutex poisoned")
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        // Runs on unwind too, so a panicking worker cannot hang the waiter.
        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        debug_assert!(*pending > 0, "wait group counter underflow");
        *pending = pending.saturating_sub(1);
        trace!(pending = *pending, "completed");
        if *pending == 0 {
            self.inner.zero.notify_all();
        }
    }
}
