//! Backup file verification
//!
//! Re-reads a backup file and recomputes each record's checksum.

use super::record::SnapshotRecord;
use crate::domain::{BatchError, ResourceRef, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A record that failed verification
#[derive(Debug, Clone, Serialize)]
pub struct BackupFailure {
    /// 1-based line number in the backup file
    pub line: usize,
    /// Resource named by the record, when it could be parsed
    pub resource: Option<ResourceRef>,
    pub reason: String,
}

/// Result of checking one backup file
#[derive(Debug, Clone, Serialize)]
pub struct BackupVerification {
    pub path: PathBuf,
    pub total: usize,
    pub valid: usize,
    pub failures: Vec<BackupFailure>,
}

impl BackupVerification {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            path = %self.path.display(),
            total = self.total,
            valid = self.valid,
            failed = self.failures.len(),
            "Backup verification completed"
        );
        for failure in &self.failures {
            tracing::warn!(
                line = failure.line,
                resource = ?failure.resource.map(|r| r.to_string()),
                reason = %failure.reason,
                "Backup record failed verification"
            );
        }
    }
}

/// Read every record of a backup file
///
/// # Errors
///
/// Fails on the first line that cannot be read or parsed.
pub async fn read_backup(path: impl AsRef<Path>) -> Result<Vec<SnapshotRecord>> {
    let path = path.as_ref();
    let mut lines = open_lines(path).await?;
    let mut records = Vec::new();
    let mut number = 0;

    while let Some(line) = lines.next_line().await? {
        number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            BatchError::Validation(format!("{}:{number}: {e}", path.display()))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Check the checksum of every record in a backup file
///
/// Unparseable lines and checksum mismatches are collected as failures; only
/// an unreadable file is an error.
pub async fn verify_backup(path: impl AsRef<Path>) -> Result<BackupVerification> {
    let path = path.as_ref();
    let mut lines = open_lines(path).await?;
    let mut report = BackupVerification {
        path: path.to_path_buf(),
        total: 0,
        valid: 0,
        failures: Vec::new(),
    };
    let mut number = 0;

    while let Some(line) = lines.next_line().await? {
        number += 1;
        if line.trim().is_empty() {
            continue;
        }
        report.total += 1;

        let record: SnapshotRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                report.failures.push(BackupFailure {
                    line: number,
                    resource: None,
                    reason: format!("unparseable record: {e}"),
                });
                continue;
            }
        };

        if record.verify()? {
            report.valid += 1;
        } else {
            report.failures.push(BackupFailure {
                line: number,
                resource: Some(record.resource),
                reason: "checksum mismatch".to_string(),
            });
        }
    }

    Ok(report)
}

async fn open_lines(path: &Path) -> Result<tokio::io::Lines<BufReader<File>>> {
    let file = File::open(path).await.map_err(|e| {
        BatchError::Io(format!("Failed to open backup file {}: {e}", path.display()))
    })?;
    Ok(BufReader::new(file).lines())
}
