//! Detail document retrieval

use crate::adapters::jss::JssTransport;
use crate::domain::{BatchError, ResourceDetail, ResourceRef, Result};
use std::sync::Arc;

/// Fetches full detail documents, one round trip per resource
pub struct DetailFetcher {
    transport: Arc<dyn JssTransport>,
}

impl DetailFetcher {
    pub fn new(transport: Arc<dyn JssTransport>) -> Self {
        Self { transport }
    }

    /// Fetch the detail document for `resource`
    ///
    /// A 404 is reported as [`BatchError::NotFound`]. Any other failure is a
    /// [`BatchError::DetailFetch`]: the request fails, the status is not
    /// successful, the body is not JSON, or the kind's wrapper key is
    /// missing. There is no retry.
    pub async fn fetch(&self, resource: ResourceRef) -> Result<ResourceDetail> {
        let fail = |reason: String| BatchError::DetailFetch { resource, reason };

        let reply = self
            .transport
            .get(&resource.path())
            .await
            .map_err(|e| fail(e.to_string()))?;

        if reply.is_not_found() {
            return Err(BatchError::NotFound(resource));
        }
        if !reply.is_success() {
            return Err(fail(format!("HTTP {}: {}", reply.status, reply.excerpt())));
        }

        let document = serde_json::from_str(&reply.body)
            .map_err(|e| fail(format!("body is not JSON: {e}")))?;

        let detail = ResourceDetail::new(resource, document).map_err(fail)?;
        tracing::debug!(resource = %resource, "Fetched detail");
        Ok(detail)
    }
}
