//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for jamf-batch using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// jamf-batch - batch jobs against the Jamf Pro Classic API
#[derive(Parser, Debug)]
#[command(name = "jamf-batch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "JAMF_BATCH_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "JAMF_BATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a collection to CSV
    Export(commands::export::ExportArgs),

    /// Back up resources to a .backup file without changing them
    Backup(commands::backup::BackupArgs),

    /// Back up, then delete the resources listed in a CSV
    Delete(commands::delete::DeleteArgs),

    /// Back up devices, then flush their queued MDM commands
    FlushCommands(commands::flush::FlushArgs),

    /// Check the checksums of a .backup file
    VerifyBackup(commands::verify::VerifyBackupArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mutate::StatusFilter;
    use crate::domain::ResourceKind;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from([
            "jamf-batch",
            "export",
            "--kind",
            "config-profile",
            "--file",
            "profiles.csv",
            "--url",
            "https://sub.jamfcloud.com",
        ]);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.kind, ResourceKind::ConfigProfile);
                assert_eq!(args.file.to_str(), Some("profiles.csv"));
                assert_eq!(
                    args.connection.url.as_deref(),
                    Some("https://sub.jamfcloud.com")
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_export_requires_file() {
        assert!(Cli::try_parse_from(["jamf-batch", "export"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config_and_log_level() {
        let cli = Cli::parse_from([
            "jamf-batch",
            "--config",
            "custom.toml",
            "--log-level",
            "debug",
            "verify-backup",
            "1700000000.000001.backup",
        ]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::VerifyBackup(_)));
    }

    #[test]
    fn test_cli_parse_delete_defaults_to_apps() {
        let cli = Cli::parse_from(["jamf-batch", "delete", "--file", "apps.csv", "--yes"]);
        match cli.command {
            Commands::Delete(args) => {
                assert_eq!(args.kind, ResourceKind::App);
                assert!(args.yes);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_flush_commands() {
        let cli = Cli::parse_from([
            "jamf-batch",
            "flush-commands",
            "--group-id",
            "185",
            "--status",
            "Pending+Failed",
            "--dry-run",
        ]);
        match cli.command {
            Commands::FlushCommands(args) => {
                assert_eq!(args.group_id.map(|g| g.get()), Some(185));
                assert_eq!(args.status, Some(StatusFilter::PendingAndFailed));
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_flush_requires_device_source() {
        assert!(Cli::try_parse_from(["jamf-batch", "flush-commands"]).is_err());
        assert!(Cli::try_parse_from([
            "jamf-batch",
            "flush-commands",
            "--group-id",
            "1",
            "--file",
            "devices.csv"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["jamf-batch", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }
}
