//! Whole-file JSON array helpers.
//!
//! A day's log is a single pretty-printed JSON array. Readers load the whole
//! array; writers replace the whole file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::storage::StorageError;

/// Read a JSON array. A missing file is an empty array.
pub async fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_slice(&data).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `items` as a two-space indented JSON array, replacing `path`.
///
/// The array is written to a sibling temporary file first and renamed over
/// the target, so readers see either the old or the new array.
pub async fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(items).map_err(|source| StorageError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_path(path);
    fs::write(&tmp, &json)
        .await
        .map_err(|e| StorageError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| StorageError::io(path, e))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
