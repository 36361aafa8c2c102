//! Resource detail documents
//!
//! A [`ResourceDetail`] is the raw JSON body returned by a detail endpoint,
//! paired with the reference it was fetched for. The document is kept intact
//! so that snapshots are a faithful copy of what the server returned.

use crate::domain::ids::ResourceRef;
use serde_json::Value;

/// Full detail document for one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDetail {
    resource: ResourceRef,
    document: Value,
}

impl ResourceDetail {
    /// Wrap a document, checking that it carries the kind's top-level key
    pub fn new(resource: ResourceRef, document: Value) -> Result<Self, String> {
        match document.get(resource.kind.detail_key()) {
            Some(Value::Object(_)) => Ok(Self { resource, document }),
            Some(_) => Err(format!(
                "'{}' is not an object",
                resource.kind.detail_key()
            )),
            None => Err(format!(
                "missing top-level key '{}'",
                resource.kind.detail_key()
            )),
        }
    }

    pub fn resource(&self) -> ResourceRef {
        self.resource
    }

    /// The complete document as returned by the server
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The object under the kind's top-level key
    pub fn body(&self) -> &Value {
        &self.document[self.resource.kind.detail_key()]
    }

    /// Look up a dotted path (`general.name`) inside the body
    ///
    /// Returns `None` for absent keys and for explicit JSON nulls.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = self.body();
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }
}
