//! Arguments and run plumbing shared by the job commands

use crate::adapters::jss::JssClient;
use crate::config::{load_config_or_default, secret_string, JamfBatchConfig};
use crate::core::batch::{BatchOrchestrator, Job, RunOptions, RunReport, Targets};
use crate::core::snapshot::{FileSnapshotStore, SnapshotStore};
use crate::domain::BatchError;
use crate::output::write_report_file;
use chrono::Utc;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Exit code: a mutation failed and no snapshot of that resource exists
pub const EXIT_UNBACKED_MUTATION: i32 = 3;
/// Exit code: configuration error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: the HTTP client could not be created
pub const EXIT_CLIENT_INIT: i32 = 4;
/// Exit code: enumeration or an output file failed
pub const EXIT_FATAL: i32 = 5;
/// Exit code: interrupted by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// JSS connection flags
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// JSS base URL, including https:// (e.g. https://sub.jamfcloud.com)
    #[arg(long, env = "JAMF_URL")]
    pub url: Option<String>,

    /// API username
    #[arg(long, env = "JAMF_USER")]
    pub user: Option<String>,

    /// API password
    #[arg(long = "pass", env = "JAMF_PASSWORD", hide_env_values = true)]
    pub pass: Option<String>,
}

/// Execution flags shared by every job
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of resources processed concurrently (1-16)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Write the run report as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Backup file location for jobs that snapshot
#[derive(Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// Directory receiving the run's .backup file
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<String>,
}

/// Load the configuration and layer CLI flags on top
///
/// Errors are returned as printable messages; callers exit with
/// [`EXIT_CONFIG`].
pub fn resolve_config(
    config_path: Option<&str>,
    connection: &ConnectionArgs,
    run: &RunArgs,
    snapshot: Option<&SnapshotArgs>,
) -> Result<JamfBatchConfig, String> {
    let mut config = load_config_or_default(config_path).map_err(|e| e.to_string())?;

    if let Some(url) = &connection.url {
        config.server.base_url = url.clone();
    }
    if let Some(user) = &connection.user {
        config.server.username = Some(user.clone());
    }
    if let Some(pass) = &connection.pass {
        config.server.password = Some(secret_string(pass.clone()));
    }
    if let Some(concurrency) = run.concurrency {
        config.batch.concurrency = concurrency;
    }
    if let Some(dir) = snapshot.and_then(|s| s.backup_dir.as_ref()) {
        config.batch.backup_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Ask for confirmation on stdin; anything but `y`/`yes` declines
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Builds collaborators for one job and runs it
pub struct JobRunner {
    config: JamfBatchConfig,
    dry_run: bool,
    shutdown: watch::Receiver<bool>,
}

impl JobRunner {
    pub fn new(config: JamfBatchConfig, dry_run: bool, shutdown: watch::Receiver<bool>) -> Self {
        let dry_run = dry_run || config.batch.dry_run;
        Self {
            config,
            dry_run,
            shutdown,
        }
    }

    pub fn config(&self) -> &JamfBatchConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run `job` over `targets`
    ///
    /// On a fatal error the message has been printed and the exit code is
    /// returned as `Err`.
    pub async fn run(&self, job: Job, targets: Targets) -> Result<RunReport, i32> {
        let client = match JssClient::new(&self.config.server) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create JSS client");
                eprintln!("Failed to initialize JSS client: {e}");
                return Err(EXIT_CLIENT_INIT);
            }
        };

        let snapshots: Option<Arc<dyn SnapshotStore>> = if job.needs_snapshots() {
            match FileSnapshotStore::create(&self.config.batch.backup_dir, Utc::now()).await {
                Ok(store) => {
                    println!("💾 Backup file: {}", store.path().display());
                    Some(Arc::new(store))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create backup file");
                    eprintln!("Failed to create backup file: {e}");
                    return Err(EXIT_FATAL);
                }
            }
        } else {
            None
        };

        let options = RunOptions {
            concurrency: self.config.batch.concurrency,
            dry_run: self.dry_run,
        };
        let orchestrator =
            BatchOrchestrator::new(client, snapshots, options, self.shutdown.clone());

        if self.dry_run && job.is_mutating() {
            println!("🔍 DRY RUN MODE - resources are backed up but not changed");
        }
        println!("🚀 Starting {job}...");

        match orchestrator.run(job, targets).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                eprintln!("Run failed: {e}");
                Err(fatal_exit_code(&e))
            }
        }
    }
}

fn fatal_exit_code(error: &BatchError) -> i32 {
    match error {
        BatchError::Configuration(_) => EXIT_CONFIG,
        _ => EXIT_FATAL,
    }
}

/// Print the summary, write the optional JSON report and pick the exit code
pub async fn finish(report: &RunReport, run: &RunArgs) -> i32 {
    report.log_summary();
    print_summary(report);

    if let Some(path) = &run.report {
        if let Err(e) = write_report_file(path, report).await {
            tracing::error!(error = %e, "Failed to write run report");
            eprintln!("Failed to write run report: {e}");
            return EXIT_FATAL;
        }
    }

    exit_code(report)
}

/// Exit code for a completed run
pub fn exit_code(report: &RunReport) -> i32 {
    if report.unbacked_mutation_failures() > 0 {
        EXIT_UNBACKED_MUTATION
    } else if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.failed() > 0 {
        1
    } else {
        0
    }
}

fn print_summary(report: &RunReport) {
    println!();
    println!("📊 Run Summary ({}):", report.job);
    println!("  Run ID: {}", report.run_id);
    println!("  Total: {}", report.total());
    println!("  Successful: {}", report.succeeded());
    println!("  Failed: {}", report.failed());
    if report.already_absent() > 0 {
        println!("  Already absent: {}", report.already_absent());
    }
    if !report.not_started.is_empty() {
        println!("  Not started: {}", report.not_started.len());
    }
    if let Some(path) = &report.backup_path {
        println!("  Backup file: {}", path.display());
    }
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", report.success_rate());
    println!();

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("⚠️  Failures:");
        for failure in failures.iter().take(10) {
            println!(
                "  - {} ({:?}): {}",
                failure.resource,
                failure.stage,
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
        if failures.len() > 10 {
            println!("  ... and {} more failures", failures.len() - 10);
        }
        println!();
    }

    if report.interrupted {
        println!("⚠️  Run interrupted. Ids that were not started are listed in the report.");
    } else if report.is_successful() {
        println!("✅ {} completed successfully!", report.job);
    } else {
        println!("⚠️  {} completed with failures", report.job);
    }
}
