//! Batch runs
//!
//! [`BatchOrchestrator`] runs a [`Job`] over its [`Targets`] and returns a
//! [`RunReport`].

pub mod orchestrator;
pub mod report;

pub use orchestrator::{BatchOrchestrator, RunOptions, Targets, MAX_CONCURRENCY};
pub use report::{Job, OperationResult, Outcome, RunReport, Stage};
