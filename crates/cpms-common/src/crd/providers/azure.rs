//! Azure failure domain and machine provider spec types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Azure failure domain: an availability zone plus an optional subnet
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AzureFailureDomain {
    /// Availability zone (e.g. "1")
    pub zone: String,

    /// Subnet name within the machine's virtual network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
}

impl AzureFailureDomain {
    /// Failure domain pinned to a zone only
    pub fn new(zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            subnet: None,
        }
    }

    /// Set the subnet
    pub fn with_subnet(mut self, subnet: impl Into<String>) -> Self {
        self.subnet = Some(subnet.into());
        self
    }
}

impl std::fmt::Display for AzureFailureDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AzureFailureDomain{{Zone:{}", self.zone)?;
        if let Some(subnet) = &self.subnet {
            write!(f, ", Subnet:{subnet}")?;
        }
        f.write_str("}")
    }
}

/// Typed view of an `AzureMachineProviderSpec` payload
///
/// Fields this layer does not interpret are kept in `extra`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AzureMachineProviderSpec {
    /// API version (e.g. "machine.openshift.io/v1beta1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Kind, always "AzureMachineProviderSpec" when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// VM size (e.g. "Standard_D8s_v3")
    #[serde(default)]
    pub vm_size: String,

    /// Azure region
    #[serde(default)]
    pub location: String,

    /// Availability zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// Subnet name
    #[serde(default)]
    pub subnet: String,

    /// Virtual network name
    #[serde(default)]
    pub vnet: String,

    /// Resource group holding the VM
    #[serde(default)]
    pub resource_group: String,

    /// Resource group holding the network resources
    #[serde(default)]
    pub network_resource_group: String,

    /// Whether to assign a public IP
    #[serde(default, rename = "publicIP")]
    pub public_ip: bool,

    /// Managed identity attached to the VM
    #[serde(default)]
    pub managed_identity: String,

    /// OS image (kept untyped)
    #[serde(default)]
    pub image: serde_json::Value,

    /// OS disk (kept untyped)
    #[serde(default)]
    pub os_disk: serde_json::Value,

    /// Fields not interpreted by this layer
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
