//! Validate config command implementation

use super::common::{resolve_config, ConnectionArgs, RunArgs, EXIT_CONFIG};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Validates the file (if any) after environment and flag overrides, the
    /// same way a job would see it.
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("<defaults and environment>");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match resolve_config(config_path, &self.connection, &RunArgs::default(), None)
        {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Server: {}", config.server.base_url);
        println!(
            "  Username: {}",
            config.server.username.as_deref().unwrap_or_default()
        );
        println!("  Timeout: {}s", config.server.timeout_seconds);
        println!("  TLS Verify: {}", config.server.tls_verify);
        println!("  Concurrency: {}", config.batch.concurrency);
        println!("  Backup Dir: {}", config.batch.backup_dir);
        println!("  Status Filter: {}", config.batch.status_filter);
        println!("  Dry Run: {}", config.batch.dry_run);
        println!();
        Ok(0)
    }
}
