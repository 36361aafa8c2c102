//! Per-kind export schemas

use crate::domain::ResourceKind;

/// How a column's value is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Missing value fails the projection
    Required,
    /// Missing value leaves the cell empty
    Optional,
    /// Extracted only when the boolean at `flag` is `true`
    Conditional { flag: &'static str },
}

/// One export column and the dotted path it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub path: &'static str,
    pub extraction: Extraction,
}

const fn required(name: &'static str, path: &'static str) -> Column {
    Column {
        name,
        path,
        extraction: Extraction::Required,
    }
}

const fn optional(name: &'static str, path: &'static str) -> Column {
    Column {
        name,
        path,
        extraction: Extraction::Optional,
    }
}

const VPP_FLAG: &str = "vpp.assign_vpp_device_based_licenses";

const fn vpp(name: &'static str, path: &'static str) -> Column {
    Column {
        name,
        path,
        extraction: Extraction::Conditional { flag: VPP_FLAG },
    }
}

const APP_COLUMNS: &[Column] = &[
    required("id", "general.id"),
    required("name", "general.name"),
    optional("display_name", "general.display_name"),
    optional("bundle_id", "general.bundle_id"),
    optional("version", "general.version"),
    optional("scope", "scope.mobile_device_groups"),
    optional("scope_all", "scope.all_mobile_devices"),
    optional("scope_all_users", "scope.all_jss_users"),
    optional("vpp_on", VPP_FLAG),
    vpp("vpp_licenses", "vpp.total_vpp_licenses"),
    vpp("vpp_licenses_used", "vpp.used_vpp_licenses"),
    vpp("vpp_licenses_remaining", "vpp.remaining_vpp_licenses"),
];

const CONFIG_PROFILE_COLUMNS: &[Column] = &[
    required("id", "general.id"),
    required("name", "general.name"),
    optional("scope", "scope.mobile_device_groups"),
    optional("scope_all", "scope.all_mobile_devices"),
    optional("scope_all_users", "scope.all_jss_users"),
];

const DEVICE_COLUMNS: &[Column] = &[
    required("id", "general.id"),
    required("name", "general.name"),
    optional("serial_number", "general.serial_number"),
    optional("udid", "general.udid"),
    optional("model", "general.model"),
    optional("os_version", "general.os_version"),
    optional("managed", "general.managed"),
];

/// Columns exported for `kind`, in output order
pub fn columns(kind: ResourceKind) -> &'static [Column] {
    match kind {
        ResourceKind::App => APP_COLUMNS,
        ResourceKind::ConfigProfile => CONFIG_PROFILE_COLUMNS,
        ResourceKind::Device => DEVICE_COLUMNS,
    }
}

/// Column names for `kind`, used as the CSV header
pub fn header(kind: ResourceKind) -> Vec<&'static str> {
    columns(kind).iter().map(|c| c.name).collect()
}
