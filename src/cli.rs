//! Command-line options for the task pool demo.

use std::time::Duration;

use clap::Parser;

use crate::config::{DEFAULT_MAX_WORK_MS, DEFAULT_TASKS, DEFAULT_WORKERS, PoolConfig};

/// Run a batch of simulated tasks on a fixed-size worker pool.
#[derive(Parser, Debug)]
#[command(name = "task_pool", version)]
pub struct Cli {
    /// Number of concurrent workers.
    #[arg(short = 'w', long, env = "TASK_POOL_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Number of tasks to generate.
    #[arg(short = 'n', long, env = "TASK_POOL_TASKS", default_value_t = DEFAULT_TASKS)]
    pub tasks: usize,

    /// Upper bound on each task's simulated work, in milliseconds.
    #[arg(long, env = "TASK_POOL_MAX_WORK_MS", default_value_t = DEFAULT_MAX_WORK_MS)]
    pub max_work_ms: u64,

    /// Seed for payloads and work durations (defaults to the clock).
    #[arg(long, env = "TASK_POOL_SEED")]
    pub seed: Option<u64>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn config(&self) -> PoolConfig {
        PoolConfig {
            worker_count: self.workers,
            batch_size: self.tasks,
            max_work: Duration::from_millis(self.max_work_ms),
            seed: self.seed,
        }
    }
}
