//! Duration providers for simulated task work.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Task;

/// Supplies how long a task's simulated work should block its worker.
pub trait WorkSource: Send + Sync {
    fn duration_for(&self, task: &Task) -> Duration;
}

/// Seed derived from the wall clock, used when no explicit seed is given.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Uniformly random durations in `[0, max)`, drawn from one seeded generator
/// shared by every worker.
pub struct RandomWork {
    rng: Mutex<StdRng>,
    max: Duration,
}

impl RandomWork {
    pub fn new(seed: u64, max: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            max,
        }
    }
}

impl WorkSource for RandomWork {
    fn duration_for(&self, _task: &Task) -> Duration {
        let max_ms = self.max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = self.rng.lock().expect("work rng mutex poisoned");
        Duration::from_millis(rng.gen_range(0..max_ms))
    }
}

/// The same duration for every task.
pub struct FixedWork(pub Duration);

impl WorkSource for FixedWork {
    fn duration_for(&self, _task: &Task) -> Duration {
        self.0
    }
}
