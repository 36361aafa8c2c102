// jamf-batch - Jamf Pro Classic API batch jobs
// Copyright (c) 2025 Jamf Batch Contributors
// Licensed under the MIT License

//! # jamf-batch
//!
//! Administrative batch jobs against the Jamf Pro Classic API ("JSS"):
//! exporting apps, configuration profiles and devices to CSV, backing them
//! up, deleting them, and flushing queued MDM commands.
//!
//! ## Overview
//!
//! Every job is the same pipeline:
//!
//! 1. **Enumerate** the ids to work on (a collection, a smart group, or a CSV)
//! 2. **Fetch** each resource's detail document
//! 3. **Project** it into an export row, or **snapshot** it to a backup file
//! 4. **Mutate** (delete or flush), only after the snapshot is on disk
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The pipeline stages and the orchestrator
//! - [`adapters`] - HTTP access to the JSS
//! - [`domain`] - Identifiers, detail documents and errors
//! - [`config`] - Configuration management
//! - [`output`] - CSV and report files
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jamf_batch::adapters::jss::JssClient;
//! use jamf_batch::config::load_config;
//! use jamf_batch::core::batch::{BatchOrchestrator, Job, RunOptions, Targets};
//! use jamf_batch::core::snapshot::{FileSnapshotStore, SnapshotStore};
//! use jamf_batch::domain::ResourceKind;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("jamf-batch.toml")?;
//!     let client = Arc::new(JssClient::new(&config.server)?);
//!     let store: Arc<dyn SnapshotStore> =
//!         Arc::new(FileSnapshotStore::create(&config.batch.backup_dir, chrono::Utc::now()).await?);
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let orchestrator =
//!         BatchOrchestrator::new(client, Some(store), RunOptions::default(), shutdown_rx);
//!     let report = orchestrator
//!         .run(
//!             Job::Backup { kind: ResourceKind::App },
//!             Targets::Collection(ResourceKind::App),
//!         )
//!         .await?;
//!
//!     println!("Backed up {} apps", report.succeeded());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::BatchError`]. Per-resource failures never
//! abort a run; they are recorded in the [`core::batch::RunReport`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod output;
