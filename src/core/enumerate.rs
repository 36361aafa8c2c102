//! Resource enumeration
//!
//! Produces the id set a run operates on. Collections are read page by page
//! until the server reports no continuation; the Classic API answers every
//! collection request with a single page.

use crate::adapters::jss::JssTransport;
use crate::domain::{BatchError, ResourceId, ResourceKind, ResourceRef, Result};
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use std::sync::Arc;

/// One page of a collection listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub refs: Vec<ResourceRef>,
    /// Path of the next page, if any
    pub next: Option<String>,
}

/// Lists resource ids from collection endpoints and smart groups
pub struct ResourceEnumerator {
    transport: Arc<dyn JssTransport>,
}

impl ResourceEnumerator {
    pub fn new(transport: Arc<dyn JssTransport>) -> Self {
        Self { transport }
    }

    /// All ids of a kind, in server order
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceRef>> {
        let pages: Vec<Page> = self.pages(kind).try_collect().await?;
        let refs: Vec<ResourceRef> = pages.into_iter().flat_map(|p| p.refs).collect();

        tracing::info!(kind = %kind, count = refs.len(), "Enumerated resources");
        Ok(refs)
    }

    /// Lazily requested pages of a collection
    pub fn pages(&self, kind: ResourceKind) -> impl Stream<Item = Result<Page>> + '_ {
        let first = Some(format!("/JSSResource/{}", kind.collection()));
        stream::try_unfold(first, move |cursor| async move {
            let Some(path) = cursor else {
                return Ok(None);
            };
            let page = self.fetch_page(kind, &path).await?;
            let next = page.next.clone();
            Ok(Some((page, next)))
        })
    }

    async fn fetch_page(&self, kind: ResourceKind, path: &str) -> Result<Page> {
        let body = self.get_json(path).await?;
        parse_collection_page(kind, &body)
    }

    /// Device members of a smart group, in server order
    pub async fn group_members(&self, group_id: ResourceId) -> Result<Vec<ResourceRef>> {
        let path = format!("/JSSResource/mobiledevicegroups/id/{group_id}");
        let body = self.get_json(&path).await?;

        let members = body
            .get("mobile_device_group")
            .and_then(|g| g.get("mobile_devices"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                BatchError::Enumeration(format!(
                    "group {group_id}: response lacks 'mobile_device_group.mobile_devices'"
                ))
            })?;

        let refs = entries_to_refs(ResourceKind::Device, members)?;
        tracing::info!(group_id = %group_id, count = refs.len(), "Enumerated smart group members");
        Ok(refs)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let reply = self
            .transport
            .get(path)
            .await
            .map_err(|e| BatchError::Enumeration(format!("GET {path}: {e}")))?;

        if !reply.is_success() {
            return Err(BatchError::Enumeration(format!(
                "GET {path}: HTTP {}: {}",
                reply.status,
                reply.excerpt()
            )));
        }

        serde_json::from_str(&reply.body)
            .map_err(|e| BatchError::Enumeration(format!("GET {path}: body is not JSON: {e}")))
    }
}

/// Parse a collection envelope such as `{"mobile_device_applications": [{"id": 1}]}`
pub fn parse_collection_page(kind: ResourceKind, body: &Value) -> Result<Page> {
    let entries = body
        .get(kind.envelope_key())
        .and_then(Value::as_array)
        .ok_or_else(|| {
            BatchError::Enumeration(format!(
                "response lacks top-level array '{}'",
                kind.envelope_key()
            ))
        })?;

    Ok(Page {
        refs: entries_to_refs(kind, entries)?,
        next: None,
    })
}

fn entries_to_refs(kind: ResourceKind, entries: &[Value]) -> Result<Vec<ResourceRef>> {
    entries
        .iter()
        .enumerate()
        .map(|(pos, entry)| {
            let raw = entry.get("id").and_then(Value::as_u64).ok_or_else(|| {
                BatchError::Enumeration(format!("entry {pos} has no integer 'id'"))
            })?;
            let id = ResourceId::new(raw)
                .map_err(|e| BatchError::Enumeration(format!("entry {pos}: {e}")))?;
            Ok(ResourceRef::new(id, kind))
        })
        .collect()
}
