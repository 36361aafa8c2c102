//! Destructive and corrective operations
//!
//! [`MutationExecutor`] issues exactly one server-side change per call:
//! deleting a resource or flushing a device's command queue. Callers are
//! responsible for snapshotting the resource first.

use crate::adapters::jss::JssTransport;
use crate::domain::{BatchError, ResourceKind, ResourceRef, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which queued MDM commands a flush removes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[serde(rename = "Pending")]
    Pending,
    #[default]
    #[serde(rename = "Failed")]
    Failed,
    #[serde(rename = "Pending+Failed")]
    PendingAndFailed,
}

impl StatusFilter {
    /// Path segment used by the commandflush endpoint
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Pending => "Pending",
            StatusFilter::Failed => "Failed",
            StatusFilter::PendingAndFailed => "Pending+Failed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(StatusFilter::Pending),
            "failed" => Ok(StatusFilter::Failed),
            "pending+failed" | "pending_and_failed" | "pending-and-failed" | "all" => {
                Ok(StatusFilter::PendingAndFailed)
            }
            _ => Err(format!(
                "Invalid status filter '{s}'. Must be one of: Pending, Failed, Pending+Failed"
            )),
        }
    }
}

/// Outcome of a successful mutation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAck {
    /// The server applied the change
    Applied,
    /// The resource did not exist (HTTP 404)
    AlreadyAbsent,
}

/// Issues delete and flush calls against the JSS
pub struct MutationExecutor {
    transport: Arc<dyn JssTransport>,
}

impl MutationExecutor {
    pub fn new(transport: Arc<dyn JssTransport>) -> Self {
        Self { transport }
    }

    /// Delete one resource
    ///
    /// A 404 is reported as [`MutationAck::AlreadyAbsent`] so that repeating
    /// a delete is not a failure.
    pub async fn delete(&self, resource: ResourceRef) -> Result<MutationAck> {
        tracing::debug!(resource = %resource, "Deleting resource");
        self.send_delete(resource, &resource.path()).await
    }

    /// Flush the command queue of one device
    pub async fn flush(&self, device: ResourceRef, filter: StatusFilter) -> Result<MutationAck> {
        if device.kind != ResourceKind::Device {
            return Err(BatchError::Mutation {
                resource: device,
                reason: "command flush applies to devices only".to_string(),
            });
        }

        tracing::debug!(resource = %device, filter = %filter, "Flushing command queue");
        self.send_delete(device, &flush_path(device, filter)).await
    }

    async fn send_delete(&self, resource: ResourceRef, path: &str) -> Result<MutationAck> {
        let reply = self
            .transport
            .delete(path)
            .await
            .map_err(|e| BatchError::Mutation {
                resource,
                reason: e.to_string(),
            })?;

        if reply.is_success() {
            Ok(MutationAck::Applied)
        } else if reply.is_not_found() {
            tracing::info!(resource = %resource, "Resource already absent");
            Ok(MutationAck::AlreadyAbsent)
        } else {
            Err(BatchError::Mutation {
                resource,
                reason: format!("HTTP {}: {}", reply.status, reply.excerpt()),
            })
        }
    }
}

fn flush_path(device: ResourceRef, filter: StatusFilter) -> String {
    format!(
        "/JSSResource/commandflush/mobiledevices/id/{}/status/{}",
        device.id,
        filter.as_str()
    )
}
