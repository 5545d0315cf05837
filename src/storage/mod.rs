//! Date-partitioned append-only location log.
//!
//! # Data Flow
//! ```text
//! append(record)
//!     → day_file.rs (record date → locations_YYYY-MM-DD.json)
//!     → json_array.rs read_array (whole day)
//!     → push record
//!     → json_array.rs write_array (whole day, temp file + rename)
//!
//! read_all()
//!     → list per-day files (ascending date)
//!     → concatenate each day's array
//! ```
//!
//! # Design Decisions
//! - One pretty-printed JSON array per UTC calendar day
//! - Appends are serialized through an async mutex so concurrent requests in
//!   one process cannot lose each other's records
//! - No index, no update, no delete

pub mod day_file;
pub mod json_array;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::capture::LocationRecord;
use crate::config::StorageConfig;

pub use day_file::{day_file_name, parse_day_file_name};

/// Error type for log storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed log file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode log file {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The per-day log files under one directory.
#[derive(Debug)]
pub struct LogStore {
    dir: PathBuf,
    prefix: String,
    write_lock: Mutex<()>,
}

impl LogStore {
    /// Open the store, creating the log directory if needed.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let dir = PathBuf::from(&config.logs_dir);
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;

        tracing::debug!(dir = %dir.display(), "Log store opened");

        Ok(Self {
            dir,
            prefix: config.file_prefix.clone(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(day_file_name(&self.prefix, date))
    }

    /// Append a record to the log of the day it was captured.
    pub async fn append(&self, record: LocationRecord) -> Result<LocationRecord, StorageError> {
        let path = self.path_for(record.log_date());

        let _guard = self.write_lock.lock().await;
        let mut records: Vec<LocationRecord> = json_array::read_array(&path).await?;
        records.push(record.clone());
        json_array::write_array(&path, &records).await?;

        tracing::debug!(
            path = %path.display(),
            count = records.len(),
            "Record appended"
        );

        Ok(record)
    }

    /// Records of one day, in insertion order.
    pub async fn read_day(&self, date: NaiveDate) -> Result<Vec<LocationRecord>, StorageError> {
        json_array::read_array(&self.path_for(date)).await
    }

    /// Records of the current UTC day.
    pub async fn read_today(&self) -> Result<Vec<LocationRecord>, StorageError> {
        self.read_day(Utc::now().date_naive()).await
    }

    /// Dates that have a log file, ascending.
    pub async fn list_days(&self) -> Result<Vec<NaiveDate>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };

        let mut days = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?
        {
            let name = entry.file_name();
            if let Some(date) = name
                .to_str()
                .and_then(|n| parse_day_file_name(&self.prefix, n))
            {
                days.push(date);
            }
        }

        days.sort_unstable();
        Ok(days)
    }

    /// Every record of every day, ordered by day then insertion.
    pub async fn read_all(&self) -> Result<Vec<LocationRecord>, StorageError> {
        let mut all = Vec::new();
        for date in self.list_days().await? {
            all.extend(self.read_day(date).await?);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureParams, ClientInfo};
    use chrono::{DateTime, TimeZone};
    use std::sync::Arc;

    fn store_in(dir: &Path) -> LogStore {
        LogStore::open(&StorageConfig {
            logs_dir: dir.to_string_lossy().into_owned(),
            file_prefix: "locations_".into(),
        })
        .unwrap()
    }

    fn record_at(lat: f64, at: DateTime<Utc>) -> LocationRecord {
        LocationRecord::new(
            CaptureParams {
                latitude: lat,
                longitude: 1.0,
                accuracy: None,
                timestamp: None,
            },
            ClientInfo {
                user_agent: None,
                ip: "127.0.0.1".into(),
            },
            at,
        )
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = store_in(&nested);
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_append_partitions_by_capture_date() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.append(record_at(1.0, day(1))).await.unwrap();
        store.append(record_at(2.0, day(2))).await.unwrap();
        store.append(record_at(3.0, day(1))).await.unwrap();

        let first = store.read_day(day(1).date_naive()).await.unwrap();
        let lats: Vec<f64> = first.iter().map(|r| r.latitude).collect();
        assert_eq!(lats, vec![1.0, 3.0]);

        assert!(tmp.path().join("locations_2024-05-02.json").is_file());
        assert!(store
            .read_day(day(3).date_naive())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_read_all_orders_by_day_and_ignores_other_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.append(record_at(3.0, day(3))).await.unwrap();
        store.append(record_at(1.0, day(1))).await.unwrap();
        store.append(record_at(2.0, day(2))).await.unwrap();
        std::fs::write(tmp.path().join("notes.json"), "not an array").unwrap();

        let days = store.list_days().await.unwrap();
        assert_eq!(days.len(), 3);
        assert!(days.windows(2).all(|w| w[0] < w[1]));

        let lats: Vec<f64> = store
            .read_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.latitude)
            .collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_malformed_day_fails_read_all() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(tmp.path().join("locations_2024-05-01.json"), "{").unwrap();

        assert!(matches!(
            store.read_all().await,
            Err(StorageError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(tmp.path()));

        let tasks: Vec<_> = (0..25)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(record_at(i as f64, day(4))).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let records = store.read_day(day(4).date_naive()).await.unwrap();
        assert_eq!(records.len(), 25);
    }
}
