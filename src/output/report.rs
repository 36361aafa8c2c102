//! JSON run report

use crate::core::batch::RunReport;
use crate::domain::{BatchError, Result};
use std::path::Path;

/// Write the run report as pretty-printed JSON
pub async fn write_report_file(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(report)?;
    tokio::fs::write(path, json).await.map_err(|e| {
        BatchError::Output(format!("Failed to write {}: {e}", path.display()))
    })?;

    tracing::info!(path = %path.display(), run_id = %report.run_id, "Run report written");
    Ok(())
}
