//! Pool sizing and simulated-work settings.

use std::time::Duration;

use crate::error::{PoolError, Result};

pub const DEFAULT_WORKERS: usize = 3;
pub const DEFAULT_TASKS: usize = 10;
pub const DEFAULT_MAX_WORK_MS: u64 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of concurrent workers.
    pub worker_count: usize,
    /// Number of tasks to generate.
    pub batch_size: usize,
    /// Exclusive upper bound on a task's simulated work.
    pub max_work: Duration,
    /// Seed for payloads and durations; `None` derives one from the clock.
    pub seed: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKERS,
            batch_size: DEFAULT_TASKS,
            max_work: Duration::from_millis(DEFAULT_MAX_WORK_MS),
            seed: None,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(PoolError::InvalidConfig(
                "worker_count must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
