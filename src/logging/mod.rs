//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - human-readable console output
//! - optional JSON file output with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use jamf_batch::config::LoggingConfig;
//! use jamf_batch::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(job = "export app", "Run started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};
