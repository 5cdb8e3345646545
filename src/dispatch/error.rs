use thiserror::Error;

/// Errors that stop a dispatcher from being built
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Worker count must be at least 1")]
    InvalidWorkers,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
