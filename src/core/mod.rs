//! Core pipeline for jamf-batch.
//!
//! Every job is one pipeline: enumerate ids, fetch each detail document, then
//! either project it into an export row or snapshot it and apply a mutation.
//!
//! # Modules
//!
//! - [`enumerate`] - Collection and smart group listing
//! - [`fetch`] - Detail document retrieval
//! - [`transform`] - Per-kind export schemas and projection
//! - [`snapshot`] - Pre-mutation snapshots, backup files and their verification
//! - [`mutate`] - Delete and command flush calls
//! - [`batch`] - Orchestration and run reports
//!
//! # Example
//!
//! ```rust,no_run
//! use jamf_batch::adapters::jss::JssClient;
//! use jamf_batch::config::load_config;
//! use jamf_batch::core::batch::{BatchOrchestrator, Job, RunOptions, Targets};
//! use jamf_batch::domain::ResourceKind;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("jamf-batch.toml")?;
//! let client = Arc::new(JssClient::new(&config.server)?);
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let orchestrator = BatchOrchestrator::new(client, None, RunOptions::default(), shutdown_rx);
//! let report = orchestrator
//!     .run(
//!         Job::Export { kind: ResourceKind::App },
//!         Targets::Collection(ResourceKind::App),
//!     )
//!     .await?;
//!
//! println!("Rows: {}", report.rows.len());
//! println!("Failed: {}", report.failed());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod enumerate;
pub mod fetch;
pub mod mutate;
pub mod snapshot;
pub mod transform;
