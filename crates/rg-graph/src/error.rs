//! Error types for rg-graph.

use thiserror::Error;

/// Errors that can occur when checking or writing a graph document.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph integrity violation: {0}")]
    Integrity(String),

    #[error("unsupported coordinate precision {0}: expected 5 or 6")]
    Precision(u8),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not move finished document into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Alias for `Result<T, GraphError>`.
pub type GraphResult<T> = Result<T, GraphError>;
