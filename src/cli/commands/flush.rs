//! Flush-commands command implementation
//!
//! Clears queued MDM commands for the members of a smart group (or the
//! devices listed in a CSV). Each device record is backed up first.

use super::common::{
    confirm, finish, resolve_config, ConnectionArgs, JobRunner, RunArgs, SnapshotArgs,
    EXIT_CONFIG, EXIT_FATAL,
};
use crate::core::batch::{Job, Targets};
use crate::core::mutate::StatusFilter;
use crate::domain::{ResourceId, ResourceKind};
use crate::output::read_id_file;
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the flush-commands command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("devices").required(true).args(["group_id", "file"])))]
pub struct FlushArgs {
    /// Smart group whose members are flushed
    #[arg(long, value_name = "ID")]
    pub group_id: Option<ResourceId>,

    /// CSV whose `id` column lists device ids
    #[arg(long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Command status to flush: Pending, Failed or Pending+Failed
    /// [default: batch.status_filter, then Failed]
    #[arg(long, value_name = "STATUS")]
    pub status: Option<StatusFilter>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Back up the device records but do not flush
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl FlushArgs {
    /// Execute the flush-commands command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting flush-commands command");

        let config =
            match resolve_config(config_path, &self.connection, &self.run, Some(&self.snapshot)) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!(error = %e, "Configuration validation failed");
                    eprintln!("Configuration validation failed: {e}");
                    return Ok(EXIT_CONFIG);
                }
            };

        let status = self.status.unwrap_or(config.batch.status_filter);

        let (targets, description) = match (&self.file, self.group_id) {
            (Some(path), _) => match read_id_file(path, ResourceKind::Device).await {
                Ok(list) => {
                    let description = format!("{} devices from {}", list.refs.len(), path.display());
                    (Targets::Explicit(list.refs), description)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read id file");
                    eprintln!("Failed to read {}: {e}", path.display());
                    return Ok(EXIT_FATAL);
                }
            },
            (None, Some(group_id)) => (
                Targets::SmartGroup(group_id),
                format!("members of smart group {group_id}"),
            ),
            (None, None) => {
                eprintln!("Either --group-id or --file is required");
                return Ok(EXIT_CONFIG);
            }
        };

        let runner = JobRunner::new(config, self.dry_run, shutdown_signal);

        if !self.yes && !runner.is_dry_run() {
            println!("Flush Configuration:");
            println!("  Server: {}", runner.config().server.base_url);
            println!("  Devices: {description}");
            println!("  Status: {status}");
            println!();
            if !confirm(&format!("Flush {status} commands for {description}?"))? {
                println!("Flush cancelled.");
                return Ok(0);
            }
        }

        match runner.run(Job::FlushCommands { status }, targets).await {
            Ok(report) => Ok(finish(&report, &self.run).await),
            Err(code) => Ok(code),
        }
    }
}
