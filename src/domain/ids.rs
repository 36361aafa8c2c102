//! Resource identifiers
//!
//! Newtype wrappers for JSS resource ids plus the resource kinds this tool
//! knows how to address. Each kind carries the endpoint and JSON key names
//! used by the Classic API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// JSS resource identifier
///
/// Classic API ids are positive integers.
///
/// # Examples
///
/// ```
/// use jamf_batch::domain::ids::ResourceId;
/// use std::str::FromStr;
///
/// let id = ResourceId::from_str("101").unwrap();
/// assert_eq!(id.get(), 101);
/// assert!(ResourceId::from_str("0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ResourceId(u64);

impl ResourceId {
    /// Creates a new ResourceId, rejecting zero
    pub fn new(id: u64) -> Result<Self, String> {
        if id == 0 {
            return Err("Resource ID must be a positive integer".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the raw id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid resource ID '{s}': expected a positive integer"))?;
        Self::new(raw)
    }
}

impl TryFrom<u64> for ResourceId {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceId> for u64 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

/// Kind of JSS resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Mobile device application
    App,
    /// Mobile device configuration profile
    ConfigProfile,
    /// Mobile device
    Device,
}

impl ResourceKind {
    /// Collection path segment under `/JSSResource`
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::App => "mobiledeviceapplications",
            ResourceKind::ConfigProfile => "configurationprofiles",
            ResourceKind::Device => "mobiledevices",
        }
    }

    /// Top-level key of the collection envelope
    pub fn envelope_key(self) -> &'static str {
        match self {
            ResourceKind::App => "mobile_device_applications",
            ResourceKind::ConfigProfile => "configuration_profiles",
            ResourceKind::Device => "mobile_devices",
        }
    }

    /// Top-level key of a detail document
    pub fn detail_key(self) -> &'static str {
        match self {
            ResourceKind::App => "mobile_device_application",
            ResourceKind::ConfigProfile => "configuration_profile",
            ResourceKind::Device => "mobile_device",
        }
    }

    /// Short label used in logs and file names
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::App => "app",
            ResourceKind::ConfigProfile => "config_profile",
            ResourceKind::Device => "device",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "app" | "apps" | "mobiledeviceapplications" => Ok(ResourceKind::App),
            "config_profile" | "config_profiles" | "configurationprofiles" => {
                Ok(ResourceKind::ConfigProfile)
            }
            "device" | "devices" | "mobiledevices" => Ok(ResourceKind::Device),
            _ => Err(format!(
                "Unknown resource kind '{s}'. Must be one of: app, config_profile, device"
            )),
        }
    }
}

/// Reference to one resource for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: ResourceId,
    pub kind: ResourceKind,
}

impl ResourceRef {
    pub fn new(id: ResourceId, kind: ResourceKind) -> Self {
        Self { id, kind }
    }

    /// Detail and delete path relative to the server base URL
    pub fn path(&self) -> String {
        format!("/JSSResource/{}/id/{}", self.kind.collection(), self.id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
