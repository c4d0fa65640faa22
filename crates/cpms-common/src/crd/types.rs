//! Shared types used across the machine template API

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Infrastructure platform a machine template targets
///
/// Serialized with the platform's own spelling (e.g. "AWS", "VSphere").
/// Only a subset has a provider config implementation; see
/// [`PlatformType::is_supported`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum PlatformType {
    /// Amazon Web Services
    #[serde(rename = "AWS")]
    Aws,
    /// Microsoft Azure
    Azure,
    /// Bare metal hosts
    BareMetal,
    /// Google Cloud Platform
    #[serde(rename = "GCP")]
    Gcp,
    /// Libvirt virtual machines
    Libvirt,
    /// OpenStack private cloud
    OpenStack,
    /// No platform integration
    None,
    /// VMware vSphere
    VSphere,
    /// oVirt / Red Hat Virtualization
    #[serde(rename = "oVirt")]
    Ovirt,
    /// IBM Cloud
    #[serde(rename = "IBMCloud")]
    IbmCloud,
    /// KubeVirt virtual machines
    KubeVirt,
    /// Equinix Metal
    EquinixMetal,
    /// IBM Power Virtual Server
    PowerVS,
    /// Alibaba Cloud
    AlibabaCloud,
    /// Nutanix AHV
    Nutanix,
    /// Externally managed infrastructure
    External,
}

impl PlatformType {
    /// Every platform type, in declaration order
    pub const ALL: [PlatformType; 16] = [
        Self::Aws,
        Self::Azure,
        Self::BareMetal,
        Self::Gcp,
        Self::Libvirt,
        Self::OpenStack,
        Self::None,
        Self::VSphere,
        Self::Ovirt,
        Self::IbmCloud,
        Self::KubeVirt,
        Self::EquinixMetal,
        Self::PowerVS,
        Self::AlibabaCloud,
        Self::Nutanix,
        Self::External,
    ];

    /// Returns true if a provider config implementation exists for this platform
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Aws | Self::Azure | Self::Gcp)
    }

    /// Wire spelling of the platform type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::BareMetal => "BareMetal",
            Self::Gcp => "GCP",
            Self::Libvirt => "Libvirt",
            Self::OpenStack => "OpenStack",
            Self::None => "None",
            Self::VSphere => "VSphere",
            Self::Ovirt => "oVirt",
            Self::IbmCloud => "IBMCloud",
            Self::KubeVirt => "KubeVirt",
            Self::EquinixMetal => "EquinixMetal",
            Self::PowerVS => "PowerVS",
            Self::AlibabaCloud => "AlibabaCloud",
            Self::Nutanix => "Nutanix",
            Self::External => "External",
        }
    }
}

impl std::str::FromStr for PlatformType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                crate::Error::malformed_field(
                    "failureDomains.platform",
                    format!("invalid platform type: {s:?}"),
                )
            })
    }
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
