//! Domain error types
//!
//! This module defines the error hierarchy for jamf-batch. Each pipeline stage
//! has its own variant so the orchestrator can classify per-id failures without
//! inspecting messages. Third-party error types are never exposed.

use crate::domain::ids::ResourceRef;
use thiserror::Error;

/// Main jamf-batch error type
#[derive(Debug, Error)]
pub enum BatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport-level errors talking to the JSS
    #[error("JSS error: {0}")]
    Jss(#[from] JssError),

    /// The collection could not be read; fatal for the run
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// One resource's detail document could not be read
    #[error("Failed to fetch detail for {resource}: {reason}")]
    DetailFetch {
        resource: ResourceRef,
        reason: String,
    },

    /// The server answered 404 for the resource's detail document
    #[error("{0} not found")]
    NotFound(ResourceRef),

    /// A field required by the export schema was missing
    #[error("Projection of {resource} failed: missing required field '{missing_path}'")]
    Projection {
        resource: ResourceRef,
        missing_path: String,
    },

    /// The pre-mutation snapshot could not be made durable
    #[error("Snapshot persist error: {0}")]
    SnapshotPersist(String),

    /// The delete or flush call failed
    #[error("Mutation of {resource} failed: {reason}")]
    Mutation {
        resource: ResourceRef,
        reason: String,
    },

    /// Output collaborator errors (CSV file, backup file)
    #[error("Output error: {0}")]
    Output(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl BatchError {
    /// Whether this error ends the whole run rather than a single id
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BatchError::Configuration(_) | BatchError::Enumeration(_) | BatchError::Output(_)
        )
    }
}

/// Transport errors
///
/// Errors raised before a status code is available. HTTP status handling is
/// left to the pipeline stage that issued the request.
#[derive(Debug, Error)]
pub enum JssError {
    /// Failed to connect to the JSS
    #[error("Failed to connect to JSS: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The response body could not be read
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<std::io::Error> for BatchError {
    fn from(err: std::io::Error) -> Self {
        BatchError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(err: serde_json::Error) -> Self {
        BatchError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BatchError {
    fn from(err: toml::de::Error) -> Self {
        BatchError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::Output(format!("CSV error: {err}"))
    }
}
