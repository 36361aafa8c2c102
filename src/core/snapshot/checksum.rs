//! Checksums over canonicalised JSON

use crate::domain::Result;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Calculate the SHA-256 checksum of a JSON document
///
/// Object keys are sorted recursively before serialization, so documents that
/// differ only in key order hash identically.
///
/// ```
/// use jamf_batch::core::snapshot::checksum::calculate_checksum;
/// use serde_json::json;
///
/// let a = calculate_checksum(&json!({"a": 1, "b": 2})).unwrap();
/// let b = calculate_checksum(&json!({"b": 2, "a": 1})).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn calculate_checksum(document: &Value) -> Result<String> {
    let canonical = serde_json::to_string(&normalize_json(document))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, normalize_json(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_json).collect()),
        _ => value.clone(),
    }
}
