//! Verify-backup command implementation

use super::common::EXIT_FATAL;
use crate::core::snapshot::verify_backup;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the verify-backup command
#[derive(Args, Debug)]
pub struct VerifyBackupArgs {
    /// Backup file to check
    #[arg(value_name = "BACKUP")]
    pub file: PathBuf,
}

impl VerifyBackupArgs {
    /// Execute the verify-backup command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file.display(), "Verifying backup file");

        let verification = match verify_backup(&self.file).await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "Backup verification failed");
                eprintln!("Failed to verify backup: {e}");
                return Ok(EXIT_FATAL);
            }
        };
        verification.log_summary();

        println!("🔍 Backup Verification: {}", self.file.display());
        println!("  Records: {}", verification.total);
        println!("  ✅ Valid: {}", verification.valid);
        println!("  ❌ Failed: {}", verification.failures.len());

        if verification.is_success() {
            println!("✅ All records match their checksums");
            return Ok(0);
        }

        println!();
        for failure in &verification.failures {
            match failure.resource {
                Some(resource) => {
                    println!("  - line {} ({resource}): {}", failure.line, failure.reason)
                }
                None => println!("  - line {}: {}", failure.line, failure.reason),
            }
        }
        Ok(1)
    }
}
