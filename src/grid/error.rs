use thiserror::Error;

/// Errors that can occur while loading or expanding a grid
#[derive(Debug, Error)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse grid from {path}: {source}")]
    ParseFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse grid JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Invalid axis: {0}")]
    InvalidAxis(String),
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
