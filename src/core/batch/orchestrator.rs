//! Batch orchestrator - drives the per-id pipeline
//!
//! Run states: Enumerating, Processing, Reporting, Done. Each id is handled by
//! one unit of work that runs fetch, then either projection or
//! snapshot-then-mutate. Units run on a bounded pool and their results are
//! collected in enumeration order.

use super::report::{Job, OperationResult, RunReport, Stage};
use crate::adapters::jss::JssTransport;
use crate::core::enumerate::ResourceEnumerator;
use crate::core::fetch::DetailFetcher;
use crate::core::mutate::{MutationAck, MutationExecutor};
use crate::core::snapshot::{SnapshotRecord, SnapshotStore};
use crate::core::transform::{project, ExportRow};
use crate::domain::{BatchError, ResourceId, ResourceKind, ResourceRef, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Upper bound for concurrent units of work
pub const MAX_CONCURRENCY: usize = 16;

/// Ids a run operates on
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Every resource of the collection
    Collection(ResourceKind),
    /// Device members of a smart group
    SmartGroup(ResourceId),
    /// A fixed list, e.g. read from an id CSV
    Explicit(Vec<ResourceRef>),
}

/// Per-run settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub concurrency: usize,
    /// Fetch and snapshot but skip the mutation
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            dry_run: false,
        }
    }
}

enum UnitOutcome {
    NotStarted(ResourceRef),
    Processed(OperationResult, Option<ExportRow>),
}

/// Runs one job over its target ids
pub struct BatchOrchestrator {
    server: String,
    enumerator: ResourceEnumerator,
    fetcher: DetailFetcher,
    executor: MutationExecutor,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    options: RunOptions,
    shutdown: watch::Receiver<bool>,
}

impl BatchOrchestrator {
    /// Create an orchestrator
    ///
    /// `snapshots` is required for every job except export. Raising the
    /// `shutdown` flag stops new units from starting.
    pub fn new(
        transport: Arc<dyn JssTransport>,
        snapshots: Option<Arc<dyn SnapshotStore>>,
        options: RunOptions,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            server: transport.base_url().to_string(),
            enumerator: ResourceEnumerator::new(transport.clone()),
            fetcher: DetailFetcher::new(transport.clone()),
            executor: MutationExecutor::new(transport),
            snapshots,
            options: RunOptions {
                concurrency: options.concurrency.clamp(1, MAX_CONCURRENCY),
                ..options
            },
            shutdown,
        }
    }

    /// Execute `job` over `targets`
    ///
    /// # Errors
    ///
    /// Only fatal conditions are returned: a job/target mismatch, a missing
    /// snapshot store, or a failed enumeration. Per-id failures are recorded
    /// in the report.
    pub async fn run(&self, job: Job, targets: Targets) -> Result<RunReport> {
        let start_time = Instant::now();
        let mut report = RunReport::new(job, self.options.dry_run, Utc::now());
        report.backup_path = self
            .snapshots
            .as_ref()
            .and_then(|s| s.location().map(|p| p.to_path_buf()));

        if job.needs_snapshots() && self.snapshots.is_none() {
            return Err(BatchError::Configuration(format!(
                "{job} requires a snapshot store"
            )));
        }

        tracing::info!(
            run_id = %report.run_id,
            job = %job,
            server = %self.server,
            state = "enumerating",
            "Run started"
        );
        let refs = self.enumerate(job, targets).await?;

        tracing::info!(
            run_id = %report.run_id,
            state = "processing",
            ids = refs.len(),
            concurrency = self.options.concurrency,
            dry_run = self.options.dry_run,
            "Processing ids"
        );

        let outcomes: Vec<UnitOutcome> = stream::iter(refs)
            .map(|resource| self.process(job, resource))
            .buffered(self.options.concurrency)
            .collect()
            .await;

        tracing::info!(run_id = %report.run_id, state = "reporting", "Aggregating results");

        for outcome in outcomes {
            match outcome {
                UnitOutcome::NotStarted(resource) => report.not_started.push(resource),
                UnitOutcome::Processed(result, row) => {
                    report.results.push(result);
                    report.rows.extend(row);
                }
            }
        }
        report.interrupted = !report.not_started.is_empty();
        report.finished_at = Utc::now();
        report.duration = start_time.elapsed();

        tracing::info!(run_id = %report.run_id, state = "done", "Run finished");
        Ok(report)
    }

    async fn enumerate(&self, job: Job, targets: Targets) -> Result<Vec<ResourceRef>> {
        let refs = match targets {
            Targets::Collection(kind) => {
                if kind != job.kind() {
                    return Err(BatchError::Configuration(format!(
                        "{job} cannot run over the {kind} collection"
                    )));
                }
                self.enumerator.list(kind).await?
            }
            Targets::SmartGroup(group_id) => {
                if job.kind() != ResourceKind::Device {
                    return Err(BatchError::Configuration(format!(
                        "{job} cannot run over smart group members"
                    )));
                }
                self.enumerator.group_members(group_id).await?
            }
            Targets::Explicit(refs) => {
                if let Some(other) = refs.iter().find(|r| r.kind != job.kind()) {
                    return Err(BatchError::Configuration(format!(
                        "{job} cannot process {other}"
                    )));
                }
                refs
            }
        };
        Ok(refs)
    }

    async fn process(&self, job: Job, resource: ResourceRef) -> UnitOutcome {
        if *self.shutdown.borrow() {
            return UnitOutcome::NotStarted(resource);
        }

        let (result, row) = self.process_unit(job, resource).await;
        if result.is_success() {
            tracing::debug!(resource = %resource, stage = ?result.stage, "Id processed");
        } else {
            tracing::warn!(
                resource = %resource,
                stage = ?result.stage,
                error = result.error.as_deref().unwrap_or_default(),
                "Id failed"
            );
        }
        UnitOutcome::Processed(result, row)
    }

    async fn process_unit(
        &self,
        job: Job,
        resource: ResourceRef,
    ) -> (OperationResult, Option<ExportRow>) {
        let detail = match self.fetcher.fetch(resource).await {
            Ok(detail) => detail,
            // nothing left to delete or flush, and nothing to snapshot
            Err(BatchError::NotFound(_)) if job.is_mutating() => {
                tracing::info!(resource = %resource, "Resource already absent");
                return (
                    OperationResult::success(resource, Stage::Fetched).mark_already_absent(),
                    None,
                );
            }
            Err(e) => return (OperationResult::failed(resource, Stage::Fetched, &e), None),
        };

        if let Job::Export { .. } = job {
            return match project(&detail) {
                Ok(projection) => (
                    OperationResult::success(resource, Stage::Projected)
                        .with_warnings(projection.warnings),
                    Some(projection.row),
                ),
                Err(e) => (OperationResult::failed(resource, Stage::Projected, &e), None),
            };
        }

        let Some(store) = &self.snapshots else {
            let e = BatchError::SnapshotPersist("no snapshot store configured".to_string());
            return (OperationResult::failed(resource, Stage::Snapshotted, &e), None);
        };

        let persisted = match SnapshotRecord::capture(&detail) {
            Ok(record) => store.persist(&record).await,
            Err(e) => Err(BatchError::SnapshotPersist(e.to_string())),
        };
        if let Err(e) = persisted {
            return (OperationResult::failed(resource, Stage::Snapshotted, &e), None);
        }

        let mutation = match job {
            _ if self.options.dry_run => None,
            Job::Delete { .. } => Some(self.executor.delete(resource).await),
            Job::FlushCommands { status } => Some(self.executor.flush(resource, status).await),
            Job::Export { .. } | Job::Backup { .. } => None,
        };

        let result = match mutation {
            None => OperationResult::success(resource, Stage::Snapshotted),
            Some(Ok(MutationAck::Applied)) => OperationResult::success(resource, Stage::Mutated),
            Some(Ok(MutationAck::AlreadyAbsent)) => {
                OperationResult::success(resource, Stage::Mutated).mark_already_absent()
            }
            Some(Err(e)) => OperationResult::failed(resource, Stage::Mutated, &e),
        };
        (result.with_snapshot(), None)
    }
}
