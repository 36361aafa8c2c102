//! Run reporting
//!
//! One [`OperationResult`] per processed id, aggregated into a [`RunReport`]
//! in enumeration order.

use crate::core::mutate::StatusFilter;
use crate::core::transform::ExportRow;
use crate::domain::{BatchError, ResourceKind, ResourceRef};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// A batch job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum Job {
    /// Fetch and project into export rows
    Export { kind: ResourceKind },
    /// Fetch and snapshot without mutating
    Backup { kind: ResourceKind },
    /// Fetch, snapshot, delete
    Delete { kind: ResourceKind },
    /// Fetch device, snapshot, flush its command queue
    FlushCommands { status: StatusFilter },
}

impl Job {
    /// Whether the job issues a server-side change
    pub fn is_mutating(self) -> bool {
        matches!(self, Job::Delete { .. } | Job::FlushCommands { .. })
    }

    /// Whether the job writes snapshots
    pub fn needs_snapshots(self) -> bool {
        !matches!(self, Job::Export { .. })
    }

    /// Resource kind the job operates on
    pub fn kind(self) -> ResourceKind {
        match self {
            Job::Export { kind } | Job::Backup { kind } | Job::Delete { kind } => kind,
            Job::FlushCommands { .. } => ResourceKind::Device,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Export { kind } => write!(f, "export {kind}"),
            Job::Backup { kind } => write!(f, "backup {kind}"),
            Job::Delete { kind } => write!(f, "delete {kind}"),
            Job::FlushCommands { status } => write!(f, "flush-commands {status}"),
        }
    }
}

/// Last pipeline stage an id reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetched,
    Projected,
    Snapshotted,
    Mutated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failed,
}

/// Result of processing one id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub resource: ResourceRef,
    pub stage: Stage,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub warnings: Vec<String>,
    /// The mutation found nothing to change (HTTP 404)
    pub already_absent: bool,
    /// A snapshot of this id was acknowledged by the store
    pub snapshotted: bool,
}

impl OperationResult {
    pub fn success(resource: ResourceRef, stage: Stage) -> Self {
        Self {
            resource,
            stage,
            outcome: Outcome::Success,
            error: None,
            warnings: Vec::new(),
            already_absent: false,
            snapshotted: false,
        }
    }

    pub fn failed(resource: ResourceRef, stage: Stage, error: &BatchError) -> Self {
        Self {
            resource,
            stage,
            outcome: Outcome::Failed,
            error: Some(error.to_string()),
            warnings: Vec::new(),
            already_absent: false,
            snapshotted: false,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_snapshot(mut self) -> Self {
        self.snapshotted = true;
        self
    }

    pub fn mark_already_absent(mut self) -> Self {
        self.already_absent = true;
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Aggregate outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub job: Job,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(skip)]
    pub duration: Duration,
    /// Per-id results, in enumeration order
    pub results: Vec<OperationResult>,
    /// Export rows, in enumeration order
    #[serde(skip)]
    pub rows: Vec<ExportRow>,
    /// Ids skipped because the run was interrupted
    pub not_started: Vec<ResourceRef>,
    pub interrupted: bool,
    pub backup_path: Option<PathBuf>,
}

impl RunReport {
    pub fn new(job: Job, dry_run: bool, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            job,
            dry_run,
            started_at,
            finished_at: started_at,
            duration: Duration::ZERO,
            results: Vec::new(),
            rows: Vec::new(),
            not_started: Vec::new(),
            interrupted: false,
            backup_path: None,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len() + self.not_started.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn already_absent(&self) -> usize {
        self.results.iter().filter(|r| r.already_absent).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Failed mutations that have no acknowledged snapshot
    ///
    /// The orchestrator only mutates after a snapshot is acknowledged, so a
    /// non-zero count means that ordering was broken. Reports built by hand
    /// (or deserialized from another tool) can still carry such results.
    pub fn unbacked_mutation_failures(&self) -> usize {
        self.failures()
            .filter(|r| r.stage == Stage::Mutated && !r.snapshotted)
            .count()
    }

    /// Check if the run completed without failures or interruption
    pub fn is_successful(&self) -> bool {
        self.failed() == 0 && !self.interrupted
    }

    /// Success rate over processed ids, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 100.0;
        }
        (self.succeeded() as f64 / self.results.len() as f64) * 100.0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            job = %self.job,
            dry_run = self.dry_run,
            total = self.total(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            already_absent = self.already_absent(),
            not_started = self.not_started.len(),
            rows = self.rows.len(),
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Run completed"
        );

        for failure in self.failures() {
            tracing::warn!(
                resource = %failure.resource,
                stage = ?failure.stage,
                error = failure.error.as_deref().unwrap_or_default(),
                "Operation failed"
            );
        }

        if self.interrupted {
            tracing::warn!(
                not_started = self.not_started.len(),
                "Run interrupted before all ids were started"
            );
        }
    }
}
