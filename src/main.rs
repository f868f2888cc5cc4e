mod cli;
mod config;
mod cpu;
mod error;
mod logging;
mod pool;
mod task_queue;
mod types;
mod wait_group;
mod work;
mod worker;

use std::sync::Arc;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::debug;

use crate::cli::Cli;
use crate::pool::{PoolReport, run_pool};
use crate::types::Task;
use crate::work::{FixedWork, RandomWork, WorkSource, time_seed};

fn print_summary(workers: usize, report: &PoolReport) {
    let cpu_user = report
        .cpu
        .map(|cpu| format!("{:.4}", cpu.user_s))
        .unwrap_or_else(|| "NA".to_string());
    let cpu_sys = report
        .cpu
        .map(|cpu| format!("{:.4}", cpu.sys_s))
        .unwrap_or_else(|| "NA".to_string());
    println!("BATCH SUMMARY");
    println!("workers={workers} tasks_total={}", report.total_processed());
    println!("tasks_per_worker_done={:?}", report.per_worker);
    println!("elapsed_ms={}", report.elapsed.as_millis());
    println!("cpu_user_s={cpu_user} cpu_sys_s={cpu_sys}");
    if report.leftover > 0 {
        eprintln!("# warning,leftover_tasks,{}", report.leftover);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = cli.config();
    config.validate()?;

    let seed = config.seed.unwrap_or_else(time_seed);
    debug!(seed, "seeded generator");
    let mut rng = StdRng::seed_from_u64(seed);
    let tasks = Task::batch(config.batch_size, &mut rng);

    let work: Arc<dyn WorkSource> = if config.max_work.is_zero() {
        Arc::new(FixedWork(config.max_work))
    } else {
        // Durations continue the same seeded sequence as the payloads.
        Arc::new(RandomWork::new(rng.r#gen::<u64>(), config.max_work))
    };

    let report = run_pool(config.worker_count, tasks, work)?;
    print_summary(config.worker_count, &report);
    Ok(())
}
