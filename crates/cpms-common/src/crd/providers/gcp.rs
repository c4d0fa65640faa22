//! GCP failure domain and machine provider spec types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// GCP failure domain: a zone
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GcpFailureDomain {
    /// Zone (e.g. "us-central1-a")
    pub zone: String,
}

impl GcpFailureDomain {
    /// Failure domain for a zone
    pub fn new(zone: impl Into<String>) -> Self {
        Self { zone: zone.into() }
    }
}

impl std::fmt::Display for GcpFailureDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GCPFailureDomain{{Zone:{}}}", self.zone)
    }
}

/// Typed view of a `GCPMachineProviderSpec` payload
///
/// Fields this layer does not interpret are kept in `extra`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GcpMachineProviderSpec {
    /// API version (e.g. "machine.openshift.io/v1beta1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Kind, always "GCPMachineProviderSpec" when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Machine type (e.g. "n2-standard-4")
    #[serde(default)]
    pub machine_type: String,

    /// GCP region
    #[serde(default)]
    pub region: String,

    /// GCP zone
    #[serde(default)]
    pub zone: String,

    /// Project the instance belongs to
    #[serde(default, rename = "projectID")]
    pub project_id: String,

    /// Attached disks (kept untyped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<serde_json::Value>,

    /// Network interfaces (kept untyped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_interfaces: Vec<serde_json::Value>,

    /// Service accounts (kept untyped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service_accounts: Vec<serde_json::Value>,

    /// Network tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Fields not interpreted by this layer
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
