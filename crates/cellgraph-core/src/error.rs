//! Error types for Cellgraph core.

use thiserror::Error;

/// Errors that can occur while reading, writing or replaying a document.
///
/// Any failure raised by the engine during replay becomes a single `Replay`
/// error carrying the offending entry and the engine's message.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("Cannot load cell {cell}: {message}")]
    Replay { cell: String, message: String },

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, StorageError>;
