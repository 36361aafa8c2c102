//! Delete command implementation
//!
//! Reads ids from a CSV (typically an earlier export), snapshots each
//! resource and deletes it.

use super::common::{
    confirm, finish, resolve_config, ConnectionArgs, JobRunner, RunArgs, SnapshotArgs,
    EXIT_CONFIG, EXIT_FATAL,
};
use crate::core::batch::{Job, Targets};
use crate::domain::ResourceKind;
use crate::output::read_id_file;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Resource kind to delete
    #[arg(long, value_enum, default_value_t = ResourceKind::App)]
    pub kind: ResourceKind,

    /// CSV whose `id` column lists the resources to delete
    #[arg(long, value_name = "CSV")]
    pub file: PathBuf,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Back up the resources but do not delete them
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl DeleteArgs {
    /// Execute the delete command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(kind = %self.kind, file = %self.file.display(), "Starting delete command");

        let config =
            match resolve_config(config_path, &self.connection, &self.run, Some(&self.snapshot)) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Configuration validation failed");
                    eprintln!("Configuration validation failed: {e}");
                    return Ok(EXIT_CONFIG);
                }
            };

        let ids = match read_id_file(&self.file, self.kind).await {
            Ok(list) => list,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read id file");
                eprintln!("Failed to read {}: {e}", self.file.display());
                return Ok(EXIT_FATAL);
            }
        };
        if !ids.skipped.is_empty() {
            println!("⚠️  Skipped {} rows without a valid id", ids.skipped.len());
        }

        let runner = JobRunner::new(config, self.dry_run, shutdown_signal);

        if !self.yes && !runner.is_dry_run() {
            println!("Delete Configuration:");
            println!("  Server: {}", runner.config().server.base_url);
            println!("  Kind: {}", self.kind);
            println!("  Ids: {}", ids.refs.len());
            println!("  Backup dir: {}", runner.config().batch.backup_dir);
            println!();
            if !confirm(&format!("Delete {} {} resources?", ids.refs.len(), self.kind))? {
                println!("Delete cancelled.");
                return Ok(0);
            }
        }

        match runner
            .run(Job::Delete { kind: self.kind }, Targets::Explicit(ids.refs))
            .await
        {
            Ok(report) => Ok(finish(&report, &self.run).await),
            Err(code) => Ok(code),
        }
    }
}
