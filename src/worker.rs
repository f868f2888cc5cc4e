//! Worker loop: drain the shared queue one task at a time.

use std::sync::Arc;

use tracing::{debug, info};

use crate::task_queue::TaskQueue;
use crate::types::WorkerId;
use crate::wait_group::Completion;
use crate::work::WorkSource;

/// Pull tasks until the queue is closed and empty, processing each one
/// synchronously. Returns how many tasks this worker handled.
///
/// `completion` is dropped on return, so the coordinator is signalled exactly
/// once whether the worker saw zero tasks or many.
pub fn run_worker(
    id: WorkerId,
    queue: Arc<TaskQueue>,
    work: Arc<dyn WorkSource>,
    completion: Completion,
) -> usize {
    let _completion = completion;
    let mut processed = 0usize;
    while let Some(task) = queue.pop_blocking_or_closed() {
        info!("worker {id} picked up task #{}", task.id());
        task.process(work.as_ref());
        processed += 1;
    }
    debug!(worker = id, processed, "queue drained, worker exiting");
    processed
}
