//! Export command implementation
//!
//! Enumerates a collection, projects every detail document and writes the
//! rows to a CSV file. The file is created before any request is made.

use super::common::{
    finish, resolve_config, ConnectionArgs, JobRunner, RunArgs, EXIT_CONFIG, EXIT_FATAL,
};
use crate::core::batch::{Job, Targets};
use crate::domain::ResourceKind;
use crate::output::ExportFile;
use clap::Args;
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Resource kind to export
    #[arg(long, value_enum, default_value_t = ResourceKind::App)]
    pub kind: ResourceKind,

    /// CSV file to write
    #[arg(long, value_name = "CSV")]
    pub file: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(kind = %self.kind, file = %self.file.display(), "Starting export command");

        let config = match resolve_config(config_path, &self.connection, &self.run, None) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration validation failed: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let export = match ExportFile::create(&self.file).await {
            Ok(export) => export,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export file");
                eprintln!("Failed to create export file: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let runner = JobRunner::new(config, false, shutdown_signal);
        let report = match runner
            .run(Job::Export { kind: self.kind }, Targets::Collection(self.kind))
            .await
        {
            Ok(report) => report,
            Err(code) => return Ok(code),
        };

        if let Err(e) = export.write(self.kind, report.rows.clone()).await {
            tracing::error!(error = %e, "Failed to write export");
            eprintln!("Failed to write export: {e}");
            return Ok(EXIT_FATAL);
        }
        println!("📄 Wrote {} rows to {}", report.rows.len(), self.file.display());

        Ok(finish(&report, &self.run).await)
    }
}
