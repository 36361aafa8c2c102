//! Snapshot records

use super::checksum::calculate_checksum;
use crate::domain::{ResourceDetail, ResourceRef, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pre-mutation copy of a resource's detail document
///
/// Serialized as one JSON line of a backup file:
///
/// ```json
/// {"resource":{"id":101,"kind":"app"},"captured_at":"...","checksum":"...","document":{...}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub resource: ResourceRef,
    pub captured_at: DateTime<Utc>,
    /// SHA-256 of the canonicalised document
    pub checksum: String,
    pub document: Value,
}

impl SnapshotRecord {
    /// Capture a detail document as it was fetched
    pub fn capture(detail: &ResourceDetail) -> Result<Self> {
        let document = detail.document().clone();
        Ok(Self {
            resource: detail.resource(),
            captured_at: Utc::now(),
            checksum: calculate_checksum(&document)?,
            document,
        })
    }

    /// Recompute the checksum and compare it with the stored one
    pub fn verify(&self) -> Result<bool> {
        Ok(calculate_checksum(&self.document)? == self.checksum)
    }
}
