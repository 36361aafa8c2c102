//! Backup command implementation
//!
//! Snapshots every resource of a kind (or the ids listed in a CSV) into a
//! backup file without changing anything on the server.

use super::common::{
    finish, resolve_config, ConnectionArgs, JobRunner, RunArgs, SnapshotArgs, EXIT_CONFIG,
    EXIT_FATAL,
};
use crate::core::batch::{Job, Targets};
use crate::domain::ResourceKind;
use crate::output::read_id_file;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the backup command
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Resource kind to back up
    #[arg(long, value_enum, default_value_t = ResourceKind::App)]
    pub kind: ResourceKind,

    /// Only back up the ids in this CSV's `id` column
    #[arg(long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl BackupArgs {
    /// Execute the backup command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(kind = %self.kind, "Starting backup command");

        let config =
            match resolve_config(config_path, &self.connection, &self.run, Some(&self.snapshot)) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Configuration validation failed");
                    eprintln!("Configuration validation failed: {e}");
                    return Ok(EXIT_CONFIG);
                }
            };

        let targets = match &self.file {
            Some(path) => match read_id_file(path, self.kind).await {
                Ok(list) => Targets::Explicit(list.refs),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read id file");
                    eprintln!("Failed to read {}: {e}", path.display());
                    return Ok(EXIT_FATAL);
                }
            },
            None => Targets::Collection(self.kind),
        };

        let runner = JobRunner::new(config, false, shutdown_signal);
        match runner.run(Job::Backup { kind: self.kind }, targets).await {
            Ok(report) => Ok(finish(&report, &self.run).await),
            Err(code) => Ok(code),
        }
    }
}
