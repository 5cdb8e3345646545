use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on result store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Result store header mismatch: expected `{expected}`, found `{found}`")]
    SchemaMismatch { expected: String, found: String },

    #[error("Malformed row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Row {index} can't be stored: {reason}")]
    UnstorableRow { index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
