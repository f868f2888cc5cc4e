//! Pool coordinator: size the queue, start the workers, feed them, join them.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cpu::{CpuTimes, cpu_times};
use crate::error::{PoolError, Result};
use crate::task_queue::TaskQueue;
use crate::types::Task;
use crate::wait_group::WaitGroup;
use crate::work::WorkSource;
use crate::worker::run_worker;

/// What a finished batch looked like from the coordinator's side.
#[derive(Debug)]
pub struct PoolReport {
    /// Tasks processed by each worker, indexed by worker id - 1.
    pub per_worker: Vec<usize>,
    pub elapsed: Duration,
    /// Tasks still queued after every worker exited. Always zero unless the
    /// queue lost a wakeup.
    pub leftover: usize,
    pub cpu: Option<CpuTimes>,
}

impl PoolReport {
    pub fn total_processed(&self) -> usize {
        self.per_worker.iter().sum()
    }
}

/// Run every task in `tasks` on `worker_count` threads and block until all
/// workers have exited.
///
/// Tasks are enqueued in order but may finish in any order. There is no
/// cancellation; a shared stop flag checked next to the queue would be the
/// place to add one.
pub fn run_pool(
    worker_count: usize,
    tasks: Vec<Task>,
    work: Arc<dyn WorkSource>,
) -> Result<PoolReport> {
    if worker_count == 0 {
        return Err(PoolError::InvalidConfig(
            "worker_count must be > 0".to_string(),
        ));
    }

    let total_tasks = tasks.len();
    info!("starting batch of {total_tasks} tasks with {worker_count} workers");

    // Sized to the batch so the producer never blocks.
    let queue = Arc::new(TaskQueue::with_capacity(total_tasks));
    let group = WaitGroup::new();
    let cpu_start = cpu_times();
    let start = Instant::now();

    let mut handles = Vec::with_capacity(worker_count);
    for id in 1..=worker_count {
        // Registered before the thread exists so `wait` cannot miss it.
        let completion = group.add();
        let worker_queue = Arc::clone(&queue);
        let work = Arc::clone(&work);
        let spawned = thread::Builder::new()
            .name(format!("worker-{id}"))
            .spawn(move || run_worker(id, worker_queue, work, completion));
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(source) => {
                // The failed closure already released its completion.
                queue.close();
                for handle in handles {
                    let _ = handle.join();
                }
                return Err(PoolError::Spawn { worker: id, source });
            }
        }
    }
    debug!(workers = group.pending(), "workers registered");

    for task in tasks {
        queue.push(task)?;
    }
    debug!(queued = queue.len(), "batch enqueued");
    // The only termination signal the workers get.
    queue.close();

    group.wait();

    let mut per_worker = Vec::with_capacity(worker_count);
    for (index, handle) in handles.into_iter().enumerate() {
        let processed = handle
            .join()
            .map_err(|_| PoolError::WorkerPanicked(index + 1))?;
        per_worker.push(processed);
    }

    // Drain any unexpected leftover tasks for reporting.
    let mut leftover = 0usize;
    while queue.try_pop().is_some() {
        leftover += 1;
    }
    if leftover > 0 {
        warn!(leftover, "tasks left in queue after all workers exited");
    }

    let elapsed = start.elapsed();
    let cpu = match (cpu_start, cpu_times()) {
        (Some(before), Some(after)) => Some(after.since(&before)),
        _ => None,
    };
    info!("batch complete");

    Ok(PoolReport {
        per_worker,
        elapsed,
        leftover,
        cpu,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskId;
    use crate::work::{FixedWork, RandomWork};
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;
    use std::sync::mpsc;

    /// Records every task handed to `process`, without sleeping.
    #[derive(Default)]
    struct RecordingWork {
        seen: Mutex<Vec<TaskId>>,
    }

    impl WorkSource for RecordingWork {
        fn duration_for(&self, task: &Task) -> Duration {
            self.seen.lock().expect("seen mutex poisoned").push(task.id());
            Duration::ZERO
        }
    }

    impl RecordingWork {
        fn counts(&self) -> BTreeMap<TaskId, usize> {
            let mut counts = BTreeMap::new();
            for id in self.seen.lock().expect("seen mutex poisoned").iter() {
                *counts.entry(*id).or_insert(0) += 1;
            }
            counts
        }
    }

    fn tasks(count: u64) -> Vec<Task> {
        (1..=count).map(|id| Task::new(id, id * 10)).collect()
    }

    fn run_recorded(workers: usize, batch: Vec<Task>) -> (PoolReport, Arc<RecordingWork>) {
        let work = Arc::new(RecordingWork::default());
        let report = run_pool(workers, batch, work.clone()).expect("pool run failed");
        (report, work)
    }

    #[test]
    fn every_task_processed_exactly_once() {
        for workers in [1, 2, 3, 8] {
            let (report, work) = run_recorded(workers, tasks(50));
            let counts = work.counts();
            assert_eq!(counts.len(), 50, "workers={workers}");
            assert!(counts.values().all(|&count| count == 1), "workers={workers}");
            assert_eq!(report.total_processed(), 50);
            assert_eq!(report.per_worker.len(), workers);
            assert_eq!(report.leftover, 0);
        }
    }

    #[test]
    fn processed_ids_do_not_depend_on_worker_count() {
        let expected: BTreeSet<TaskId> = (1..=20).collect();
        for workers in [1, 4, 20, 25] {
            let (_, work) = run_recorded(workers, tasks(20));
            let ids: BTreeSet<TaskId> = work.counts().into_keys().collect();
            assert_eq!(ids, expected, "workers={workers}");
        }
    }

    #[test]
    fn empty_batch_returns_without_processing() {
        let (report, work) = run_recorded(3, Vec::new());
        assert!(work.counts().is_empty());
        assert_eq!(report.per_worker, vec![0, 0, 0]);
    }

    #[test]
    fn surplus_workers_exit_without_tasks() {
        let (report, work) = run_recorded(6, tasks(2));
        assert_eq!(work.counts().len(), 2);
        assert_eq!(report.per_worker.len(), 6);
        assert_eq!(report.total_processed(), 2);
        assert!(report.per_worker.iter().filter(|&&n| n == 0).count() >= 4);
    }

    #[test]
    fn three_tasks_on_two_workers() {
        let batch = vec![Task::new(1, 10), Task::new(2, 20), Task::new(3, 30)];
        let work: Arc<dyn WorkSource> = Arc::new(FixedWork(Duration::from_millis(20)));
        let report = run_pool(2, batch, work).expect("pool run failed");
        assert_eq!(report.total_processed(), 3);
        assert_eq!(report.per_worker.len(), 2);
        // Two workers, three 20ms tasks: at least one worker ran twice.
        assert!(report.elapsed >= Duration::from_millis(40));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let work: Arc<dyn WorkSource> = Arc::new(FixedWork(Duration::ZERO));
        let err = run_pool(0, tasks(3), work).expect_err("zero workers accepted");
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn reruns_are_independent() {
        let batch = tasks(12);
        let (first, first_work) = run_recorded(3, batch.clone());
        let (second, second_work) = run_recorded(3, batch);
        assert_eq!(first.total_processed(), 12);
        assert_eq!(second.total_processed(), 12);
        assert_eq!(first_work.counts(), second_work.counts());
        assert_eq!(second.leftover, 0);
    }

    #[test]
    fn random_work_batch_finishes_in_bounded_time() {
        let (done_tx, done_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            let work: Arc<dyn WorkSource> =
                Arc::new(RandomWork::new(11, Duration::from_millis(10)));
            let report = run_pool(3, tasks(15), work).expect("pool run failed");
            done_tx.send(report.total_processed()).expect("done");
        });
        // 15 tasks under 10ms each on 3 workers: well under the timeout.
        let processed = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("pool did not terminate");
        assert_eq!(processed, 15);
        handle.join().expect("pool thread panicked");
    }
}
