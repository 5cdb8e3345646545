use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::grid::GridError;
use crate::store::StoreError;

/// Errors that stop a run.
///
/// Failures of individual trials are not errors at this level; they are
/// counted in the [`super::RunSummary`].
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Result store error: {0}")]
    Store(#[from] StoreError),

    #[error("Dispatcher error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
