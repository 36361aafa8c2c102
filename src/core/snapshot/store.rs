//! Durable snapshot storage
//!
//! [`FileSnapshotStore`] appends one JSON line per record to a run-scoped
//! backup file and syncs it before acknowledging. Appends are serialised
//! behind an async mutex so concurrent units never interleave lines.
//!
//! A failed append is truncated back to the last acknowledged line so the next
//! record starts on a clean line. If that truncation fails too, the store
//! refuses every later record.

use super::record::SnapshotRecord;
use crate::domain::{BatchError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Acknowledgement that a record is durable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotAck {
    /// 1-based position of the record in the store
    pub sequence: u64,
}

/// Append-only store for pre-mutation snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist one record; returns only once the record is durable
    async fn persist(&self, record: &SnapshotRecord) -> Result<SnapshotAck>;

    /// Where the records end up, for reporting
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Durable line-oriented output
#[async_trait]
trait LineSink: Send {
    /// Write the whole line and make it durable
    async fn write_line(&mut self, line: &[u8]) -> io::Result<()>;

    /// Cut the output back to `len` bytes
    async fn truncate(&mut self, len: u64) -> io::Result<()>;
}

#[async_trait]
impl LineSink for File {
    async fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.write_all(line).await?;
        self.flush().await?;
        self.sync_data().await
    }

    async fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len).await?;
        self.sync_data().await
    }
}

struct Appender<S> {
    sink: S,
    /// Bytes covered by acknowledged records
    len: u64,
    written: u64,
    poisoned: bool,
}

impl<S: LineSink> Appender<S> {
    fn new(sink: S) -> Self {
        Self {
            sink,
            len: 0,
            written: 0,
            poisoned: false,
        }
    }

    /// Append one line, returning its 1-based sequence number
    async fn append(&mut self, line: &[u8]) -> io::Result<u64> {
        if self.poisoned {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "backup file holds a partial record that could not be removed",
            ));
        }

        if let Err(e) = self.sink.write_line(line).await {
            if let Err(rollback) = self.sink.truncate(self.len).await {
                tracing::error!(
                    error = %rollback,
                    len = self.len,
                    "Failed to remove partial snapshot record; refusing further snapshots"
                );
                self.poisoned = true;
            }
            return Err(e);
        }

        self.len += line.len() as u64;
        self.written += 1;
        Ok(self.written)
    }
}

/// Backup file named after the run start time
pub struct FileSnapshotStore {
    path: PathBuf,
    appender: Mutex<Appender<File>>,
}

impl FileSnapshotStore {
    /// Create `{dir}/{unix_secs}.{micros}.backup` for a run started at `run_start`
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Output`] when the directory or file cannot be
    /// created. Callers treat this as fatal for the run.
    pub async fn create(dir: impl AsRef<Path>, run_start: DateTime<Utc>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(|e| {
            BatchError::Output(format!(
                "Failed to create backup directory {}: {e}",
                dir.display()
            ))
        })?;

        let path = dir.join(backup_file_name(run_start));
        let file = OpenOptions::new()
            .create_new(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| {
                BatchError::Output(format!(
                    "Failed to create backup file {}: {e}",
                    path.display()
                ))
            })?;

        tracing::info!(path = %path.display(), "Backup file created");

        Ok(Self {
            path,
            appender: Mutex::new(Appender::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn persist(&self, record: &SnapshotRecord) -> Result<SnapshotAck> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| BatchError::SnapshotPersist(format!("{}: {e}", record.resource)))?;
        line.push(b'\n');

        let fail = |e: std::io::Error| {
            BatchError::SnapshotPersist(format!(
                "{}: write to {} failed: {e}",
                record.resource,
                self.path.display()
            ))
        };

        let sequence = self.appender.lock().await.append(&line).await.map_err(fail)?;

        tracing::debug!(resource = %record.resource, sequence, "Snapshot persisted");

        Ok(SnapshotAck { sequence })
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// `1700000000.123456.backup`
pub fn backup_file_name(run_start: DateTime<Utc>) -> String {
    format!(
        "{}.{:06}.backup",
        run_start.timestamp(),
        run_start.timestamp_subsec_micros()
    )
}
