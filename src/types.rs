//! Shared identifiers and the task model used across the pool.

use std::thread;

use rand::Rng;
use tracing::info;

use crate::work::WorkSource;

/// Unique identifier for a task within a batch (1-based).
pub type TaskId = u64;
/// Identifier of a worker thread (1..=N).
pub type WorkerId = usize;

/// Upper bound (exclusive) for generated payloads.
const PAYLOAD_MAX: u64 = 100;

/// Unit of simulated work handed to exactly one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Stable task identifier for logging and validation.
    id: TaskId,
    /// Magnitude of the simulated work; reported, never interpreted.
    payload: u64,
}

impl Task {
    /// Construct a task with the provided id and payload.
    pub fn new(id: TaskId, payload: u64) -> Self {
        Self { id, payload }
    }

    /// Build a batch with sequential ids `1..=size` and random payloads.
    pub fn batch<R: Rng>(size: usize, rng: &mut R) -> Vec<Task> {
        (1..=size as u64)
            .map(|id| Task::new(id, rng.gen_range(0..PAYLOAD_MAX)))
            .collect()
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Simulate the work by blocking the calling worker, then return.
    pub fn process(&self, work: &dyn WorkSource) {
        info!("processing task #{} with payload {}", self.id, self.payload);
        let duration = work.duration_for(self);
        if !duration.is_zero() {
            thread::sleep(duration);
        }
        info!("task #{} complete", self.id);
    }
}
