//! Bounded, closable FIFO hand-off between the coordinator and its workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

use thiserror::Error;
use tracing::trace;

use crate::types::Task;

/// Push rejected because the queue was closed; the task is handed back.
#[derive(Debug, Error)]
#[error("task queue closed, rejected {0:?}")]
pub struct PushError(pub Task);

/// A synchronized FIFO of tasks with a fixed capacity and a `closed` state.
pub struct TaskQueue {
    inner: Mutex<TaskQueueState>,
    available: Condvar,
    space: Condvar,
    capacity: usize,
}

struct TaskQueueState {
    queue: VecDeque<Task>,
    closed: bool,
}

impl TaskQueue {
    /// Create an empty queue holding at most `capacity` tasks (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(TaskQueueState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            available: Condvar::new(),
            space: Condvar::new(),
            capacity,
        }
    }

    /// Push a task, blocking while the queue is full.
    /// Returns the task back if the queue is closed.
    pub fn push(&self, task: Task) -> Result<(), PushError> {
        let mut guard = self.inner.lock().expect("task queue mutex poisoned");
        loop {
            if guard.closed {
                return Err(PushError(task));
            }
            if guard.queue.len() < self.capacity {
                break;
            }
            guard = self.space.wait(guard).expect("condvar wait failed");
        }
        trace!(task = task.id(), "enqueued");
        guard.queue.push_back(task);
        self.available.notify_one();
        Ok(())
    }

    /// Try to pop immediately without blocking.
    pub fn try_pop(&self) -> Option<Task> {
        let mut guard = self.inner.lock().expect("task queue mutex poisoned");
        let task = guard.queue.pop_front();
        if task.is_some() {
            self.space.notify_one();
        }
        task
    }

    /// Block until a task is available or the queue is closed and drained.
    pub fn pop_blocking_or_closed(&self) -> Option<Task> {
        let mut guard = self.inner.lock().expect("task queue mutex poisoned");
        loop {
            if let Some(task) = guard.queue.pop_front() {
                self.space.notify_one();
                return Some(task);
            }
            if guard.closed {
                return None;
            }
            // Wait releases the lock and re-acquires it before returning.
            guard = self.available.wait(guard).expect("condvar wait failed");
        }
    }

    /// Close the queue and wake all blocked producers and consumers.
    /// Tasks already queued are still delivered.
    pub fn close(&self) {
        let mut guard = self.inner.lock().expect("task queue mutex poisoned");
        guard.closed = true;
        self.available.notify_all();
        self.space.notify_all();
    }

    /// Current number of queued tasks.
    pub fn len(&self) -> usize {
        let guard = self.inner.lock().expect("task queue mutex poisoned");
        guard.queue.len()
    }
}
