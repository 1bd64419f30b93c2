use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing a persisted flat-file document.
///
/// A mutation that fails with a `Write` error leaves both the in-memory
/// document and the file on disk untouched; callers observe the pre-mutation
/// state on the next read.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document exists on disk but is not valid JSON for its schema.
    #[error("Malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
