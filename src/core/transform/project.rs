//! Record projection
//!
//! Pure mapping from a [`ResourceDetail`] to an [`ExportRow`]. The row always
//! carries every schema column; absent source fields become
//! [`ExportValue::Empty`].

use super::schema::{columns, Extraction};
use crate::domain::{BatchError, ResourceDetail, ResourceRef, Result};
use serde_json::Value;
use std::fmt;

/// One export cell
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Arrays and objects, kept as compact JSON
    Structured(String),
}

impl ExportValue {
    /// Convert a JSON value; `null` becomes [`ExportValue::Empty`]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ExportValue::Empty,
            Value::Bool(b) => ExportValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ExportValue::Integer(i),
                None => n
                    .as_f64()
                    .map(ExportValue::Float)
                    .unwrap_or_else(|| ExportValue::Text(n.to_string())),
            },
            Value::String(s) => ExportValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => ExportValue::Structured(value.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExportValue::Empty)
    }
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Empty => Ok(()),
            ExportValue::Text(s) | ExportValue::Structured(s) => f.write_str(s),
            ExportValue::Integer(i) => write!(f, "{i}"),
            ExportValue::Float(x) => write!(f, "{x}"),
            ExportValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Ordered `(column, value)` cells for one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    resource: ResourceRef,
    cells: Vec<(&'static str, ExportValue)>,
}

impl ExportRow {
    pub fn resource(&self) -> ResourceRef {
        self.resource
    }

    pub fn cells(&self) -> &[(&'static str, ExportValue)] {
        &self.cells
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.cells.iter().map(|(name, _)| *name).collect()
    }

    pub fn get(&self, column: &str) -> Option<&ExportValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Cell values rendered as CSV fields
    pub fn to_record(&self) -> Vec<String> {
        self.cells.iter().map(|(_, v)| v.to_string()).collect()
    }
}

/// A projected row plus any non-fatal findings
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub row: ExportRow,
    pub warnings: Vec<String>,
}

/// Project a detail document through its kind's schema
///
/// # Errors
///
/// Returns [`BatchError::Projection`] naming the first missing required path.
pub fn project(detail: &ResourceDetail) -> Result<Projection> {
    let resource = detail.resource();
    let mut cells = Vec::with_capacity(columns(resource.kind).len());
    let mut warnings = Vec::new();

    for column in columns(resource.kind) {
        let value = match column.extraction {
            Extraction::Required => match detail.lookup(column.path) {
                Some(v) => ExportValue::from_json(v),
                None => {
                    return Err(BatchError::Projection {
                        resource,
                        missing_path: column.path.to_string(),
                    })
                }
            },
            Extraction::Optional => detail
                .lookup(column.path)
                .map(ExportValue::from_json)
                .unwrap_or(ExportValue::Empty),
            Extraction::Conditional { flag } => {
                let enabled = detail.lookup(flag).and_then(Value::as_bool) == Some(true);
                match (enabled, detail.lookup(column.path)) {
                    (true, Some(v)) => ExportValue::from_json(v),
                    (true, None) => {
                        warnings.push(format!(
                            "{}: '{}' missing although '{}' is true",
                            column.name, column.path, flag
                        ));
                        ExportValue::Empty
                    }
                    (false, _) => ExportValue::Empty,
                }
            }
        };
        cells.push((column.name, value));
    }

    for warning in &warnings {
        tracing::warn!(resource = %resource, warning = %warning, "Projection warning");
    }

    Ok(Projection {
        row: ExportRow { resource, cells },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::schema::header;
    use crate::domain::{ResourceId, ResourceKind};
    use serde_json::json;
    use test_case::test_case;

    fn detail(kind: ResourceKind, id: u64, document: Value) -> ResourceDetail {
        ResourceDetail::new(ResourceRef::new(ResourceId::new(id).unwrap(), kind), document)
            .unwrap()
    }

    fn app(vpp: Value) -> ResourceDetail {
        detail(
            ResourceKind::App,
            101,
            json!({
                "mobile_device_application": {
                    "general": {
                        "id": 101,
                        "name": "Notes",
                        "display_name": "Notes",
                        "bundle_id": "com.example.notes",
                        "version": "2.1"
                    },
                    "scope": {
                        "all_mobile_devices": false,
                        "all_jss_users": false,
                        "mobile_device_groups": [{"id": 3, "name": "Staff"}]
                    },
                    "vpp": vpp
                }
            }),
        )
    }

    #[test_case(ResourceKind::App, "mobile_device_application" ; "app")]
    #[test_case(ResourceKind::ConfigProfile, "configuration_profile" ; "config profile")]
    #[test_case(ResourceKind::Device, "mobile_device" ; "device")]
    fn test_minimal_document_yields_full_schema(kind: ResourceKind, key: &str) {
        let mut doc = serde_json::Map::new();
        doc.insert(key.to_string(), json!({"general": {"id": 9, "name": "x"}}));
        let projection = project(&detail(kind, 9, Value::Object(doc))).unwrap();

        assert_eq!(projection.row.columns(), header(kind));
        assert!(projection.row.cells()[2..].iter().all(|(_, v)| v.is_empty()));
        assert!(projection.warnings.is_empty());
    }

    #[test]
    fn test_app_with_vpp_enabled() {
        let projection = project(&app(json!({
            "assign_vpp_device_based_licenses": true,
            "total_vpp_licenses": 50,
            "used_vpp_licenses": 20,
            "remaining_vpp_licenses": 30
        })))
        .unwrap();
        let row = &projection.row;

        assert_eq!(row.get("id"), Some(&ExportValue::Integer(101)));
        assert_eq!(row.get("vpp_on"), Some(&ExportValue::Bool(true)));
        assert_eq!(row.get("vpp_licenses_remaining"), Some(&ExportValue::Integer(30)));
        assert_eq!(
            row.get("scope"),
            Some(&ExportValue::Structured(
                r#"[{"id":3,"name":"Staff"}]"#.to_string()
            ))
        );
        assert!(projection.warnings.is_empty());
    }

    #[test]
    fn test_app_with_vpp_disabled_ignores_counters() {
        let projection = project(&app(json!({
            "assign_vpp_device_based_licenses": false,
            "total_vpp_licenses": 50
        })))
        .unwrap();

        assert_eq!(projection.row.get("vpp_on"), Some(&ExportValue::Bool(false)));
        assert_eq!(projection.row.get("vpp_licenses"), Some(&ExportValue::Empty));
    }

    #[test]
    fn test_app_vpp_enabled_missing_counters_warns() {
        let projection = project(&app(json!({
            "assign_vpp_device_based_licenses": true,
            "total_vpp_licenses": 50
        })))
        .unwrap();

        assert_eq!(projection.row.get("vpp_licenses"), Some(&ExportValue::Integer(50)));
        assert_eq!(projection.row.get("vpp_licenses_used"), Some(&ExportValue::Empty));
        assert_eq!(projection.warnings.len(), 2);
        assert!(projection.warnings[0].contains("vpp.used_vpp_licenses"));
    }

    #[test]
    fn test_missing_required_field() {
        let doc = json!({"mobile_device": {"general": {"id": 4}}});
        let err = project(&detail(ResourceKind::Device, 4, doc)).unwrap_err();
        match err {
            BatchError::Projection { missing_path, .. } => assert_eq!(missing_path, "general.name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_to_record_renders_cells() {
        let doc = json!({"configuration_profile": {
            "general": {"id": 5, "name": "Wi-Fi"},
            "scope": {"all_mobile_devices": true, "all_jss_users": false, "mobile_device_groups": []}
        }});
        let projection = project(&detail(ResourceKind::ConfigProfile, 5, doc)).unwrap();
        assert_eq!(
            projection.row.to_record(),
            vec!["5", "Wi-Fi", "[]", "true", "false"]
        );
    }
}
