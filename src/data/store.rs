//! Flat-file JSON document storage.
//!
//! Documents are human-inspectable pretty-printed JSON. Writes go to a
//! sibling temp file first and are renamed over the target, so a crash
//! mid-write never leaves a truncated document behind.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::storage::StorageError;

/// Loads a document from disk, or returns the default when the file does not
/// exist yet.
///
/// # Returns
/// - `Ok(T)` - Parsed document, or `T::default()` for a missing file
/// - `Err(StorageError::Read)` - The file exists but could not be read
/// - `Err(StorageError::Malformed)` - The file is not valid JSON for `T`
pub async fn load_or_default<T>(path: &Path) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source: err,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|err| StorageError::Malformed {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Persists a document to disk atomically.
///
/// Serializes to pretty JSON, writes to `<path>.tmp`, then renames the temp
/// file over the target. Creates the parent directory on first write.
pub async fn persist<T: Serialize>(path: &Path, document: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(document)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::Write {
                    path: path.to_path_buf(),
                    source: err,
                })?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json)
        .await
        .map_err(|err| StorageError::Write {
            path: tmp.clone(),
            source: err,
        })?;

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|err| StorageError::Write {
            path: path.to_path_buf(),
            source: err,
        })
}
