//! Failure domains: placement constraints for control plane machines
//!
//! [`FailureDomains`] is the API shape embedded in a machine template: a
//! platform tag plus one list per platform. [`FailureDomain`] is the value
//! object the rest of the operator passes around: exactly one platform's
//! coordinates, tagged with that platform.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::providers::{AwsFailureDomain, AzureFailureDomain, GcpFailureDomain};
use super::types::PlatformType;
use crate::{Error, Result};

/// Failure domains configured on a machine template
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailureDomains {
    /// Platform the failure domains apply to; an empty string means unset
    #[serde(
        default,
        deserialize_with = "deserialize_platform",
        skip_serializing_if = "Option::is_none"
    )]
    pub platform: Option<PlatformType>,

    /// AWS failure domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<Vec<AwsFailureDomain>>,

    /// Azure failure domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<Vec<AzureFailureDomain>>,

    /// GCP failure domains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp: Option<Vec<GcpFailureDomain>>,
}

fn deserialize_platform<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PlatformType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl FailureDomains {
    /// AWS failure domains
    pub fn aws(domains: Vec<AwsFailureDomain>) -> Self {
        Self {
            platform: Some(PlatformType::Aws),
            aws: Some(domains),
            ..Default::default()
        }
    }

    /// Azure failure domains
    pub fn azure(domains: Vec<AzureFailureDomain>) -> Self {
        Self {
            platform: Some(PlatformType::Azure),
            azure: Some(domains),
            ..Default::default()
        }
    }

    /// GCP failure domains
    pub fn gcp(domains: Vec<GcpFailureDomain>) -> Self {
        Self {
            platform: Some(PlatformType::Gcp),
            gcp: Some(domains),
            ..Default::default()
        }
    }

    /// List the failure domains for the configured platform
    ///
    /// An unset platform with no lists yields an empty list. An unset
    /// platform with lists present is malformed.
    pub fn failure_domains(&self) -> Result<Vec<FailureDomain>> {
        let Some(platform) = self.platform else {
            let any_listed = self.aws.as_ref().is_some_and(|d| !d.is_empty())
                || self.azure.as_ref().is_some_and(|d| !d.is_empty())
                || self.gcp.as_ref().is_some_and(|d| !d.is_empty());
            if any_listed {
                return Err(Error::malformed_field(
                    "failureDomains.platform",
                    "platform must be set when failure domains are listed",
                ));
            }
            return Ok(Vec::new());
        };

        match platform {
            PlatformType::Aws => Ok(self
                .aws
                .iter()
                .flatten()
                .cloned()
                .map(FailureDomain::Aws)
                .collect()),
            PlatformType::Azure => Ok(self
                .azure
                .iter()
                .flatten()
                .cloned()
                .map(FailureDomain::Azure)
                .collect()),
            PlatformType::Gcp => Ok(self
                .gcp
                .iter()
                .flatten()
                .cloned()
                .map(FailureDomain::Gcp)
                .collect()),
            other => Err(Error::unsupported_platform(other, "failureDomains.platform")),
        }
    }
}

/// A single failure domain, tagged with the platform it applies to
///
/// Not `PartialEq`: comparing failure domains of different platforms is an
/// error, see [`FailureDomain::equal`].
#[derive(Clone, Debug)]
pub enum FailureDomain {
    /// AWS availability zone and subnet
    Aws(AwsFailureDomain),
    /// Azure zone and subnet
    Azure(AzureFailureDomain),
    /// GCP zone
    Gcp(GcpFailureDomain),
}

impl FailureDomain {
    /// Platform this failure domain applies to
    pub fn platform_type(&self) -> PlatformType {
        match self {
            Self::Aws(_) => PlatformType::Aws,
            Self::Azure(_) => PlatformType::Azure,
            Self::Gcp(_) => PlatformType::Gcp,
        }
    }

    /// AWS coordinates, if this is an AWS failure domain
    pub fn aws(&self) -> Option<&AwsFailureDomain> {
        match self {
            Self::Aws(fd) => Some(fd),
            _ => None,
        }
    }

    /// Azure coordinates, if this is an Azure failure domain
    pub fn azure(&self) -> Option<&AzureFailureDomain> {
        match self {
            Self::Azure(fd) => Some(fd),
            _ => None,
        }
    }

    /// GCP coordinates, if this is a GCP failure domain
    pub fn gcp(&self) -> Option<&GcpFailureDomain> {
        match self {
            Self::Gcp(fd) => Some(fd),
            _ => None,
        }
    }

    /// Compare two failure domains of the same platform
    ///
    /// Returns `MismatchedPlatformTypes` when the platforms differ.
    pub fn equal(&self, other: &FailureDomain) -> Result<bool> {
        match (self, other) {
            (Self::Aws(a), Self::Aws(b)) => Ok(a == b),
            (Self::Azure(a), Self::Azure(b)) => Ok(a == b),
            (Self::Gcp(a), Self::Gcp(b)) => Ok(a == b),
            _ => Err(Error::mismatched_platform_types(
                "compare failure domains",
                self.platform_type(),
                other.platform_type(),
            )),
        }
    }

    /// Fill coordinates that are absent on `self` from `base`
    ///
    /// A failure domain that only names a zone leaves the subnet to the
    /// template; completing it against the template's own failure domain
    /// yields the placement a machine built from it will actually have.
    pub fn complete(&self, base: &FailureDomain) -> Result<FailureDomain> {
        match (self, base) {
            (Self::Aws(fd), Self::Aws(base)) => {
                let mut out = fd.clone();
                if out.placement.availability_zone.is_empty() {
                    out.placement.availability_zone = base.placement.availability_zone.clone();
                }
                if out.subnet.is_none() {
                    out.subnet = base.subnet.clone();
                }
                Ok(Self::Aws(out))
            }
            (Self::Azure(fd), Self::Azure(base)) => {
                let mut out = fd.clone();
                if out.zone.is_empty() {
                    out.zone = base.zone.clone();
                }
                if out.subnet.is_none() {
                    out.subnet = base.subnet.clone();
                }
                Ok(Self::Azure(out))
            }
            (Self::Gcp(fd), Self::Gcp(base)) => {
                let mut out = fd.clone();
                if out.zone.is_empty() {
                    out.zone = base.zone.clone();
                }
                Ok(Self::Gcp(out))
            }
            _ => Err(Error::mismatched_platform_types(
                "complete failure domain",
                self.platform_type(),
                base.platform_type(),
            )),
        }
    }
}

impl From<AwsFailureDomain> for FailureDomain {
    fn from(fd: AwsFailureDomain) -> Self {
        Self::Aws(fd)
    }
}

impl From<AzureFailureDomain> for FailureDomain {
    fn from(fd: AzureFailureDomain) -> Self {
        Self::Azure(fd)
    }
}

impl From<GcpFailureDomain> for FailureDomain {
    fn from(fd: GcpFailureDomain) -> Self {
        Self::Gcp(fd)
    }
}

impl std::fmt::Display for FailureDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aws(fd) => std::fmt::Display::fmt(fd, f),
            Self::Azure(fd) => std::fmt::Display::fmt(fd, f),
            Self::Gcp(fd) => std::fmt::Display::fmt(fd, f),
        }
    }
}
