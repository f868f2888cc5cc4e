//! Errors surfaced by the pool coordinator.

use std::io;

use thiserror::Error;

use crate::task_queue::PushError;
use crate::types::WorkerId;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: WorkerId,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Queue(#[from] PushError),

    #[error("worker {0} panicked")]
    WorkerPanicked(WorkerId),
}

pub type Result<T> = std::result::Result<T, PoolError>;
