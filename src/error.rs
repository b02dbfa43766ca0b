use thiserror::Error;

/// Errors produced while setting up or running a pool.
#[derive(Debug, Error)]
pub enum Error {
    /// A pool needs at least one worker.
    #[error("invalid worker count {0}, a pool needs at least one worker")]
    InvalidWorkerCount(u32),

    /// Work was submitted after the runner was shut down.
    #[error("runner is shut down, job rejected")]
    Rejected,

    #[error("failed to build rayon thread pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
