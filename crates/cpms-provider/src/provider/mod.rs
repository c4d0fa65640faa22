//! Provider config abstraction layer
//!
//! A [`ProviderConfig`] is the parsed provider spec of one machine template
//! for exactly one platform. It is selected once by [`new_provider_config`]
//! and never re-dispatched: every operation either stays within the platform
//! it was built for or fails with `MismatchedPlatformTypes`.
//!
//! Each supported platform implements [`PlatformProviderConfig`]. Adding a
//! platform means adding one implementation, one variant and one arm in the
//! dispatch match.
//!
//! # Supported Platforms
//!
//! - [`AwsProviderConfig`] - AWS `AWSMachineProviderConfig`
//! - [`AzureProviderConfig`] - Azure `AzureMachineProviderSpec`
//! - [`GcpProviderConfig`] - GCP `GCPMachineProviderSpec`
//!
//! # Example
//!
//! ```text
//! let config = new_provider_config(&template)?;
//! let desired = config.inject_failure_domain(&failure_domain)?;
//! if !desired.equal(&live)? {
//!     // replace the machine
//! }
//! ```

mod aws;
mod azure;
mod document;
mod gcp;

pub use aws::AwsProviderConfig;
pub use azure::AzureProviderConfig;
pub use document::IgnoredField;
pub use gcp::GcpProviderConfig;

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use cpms_common::crd::{
    FailureDomain, MachineSpec, OpenShiftMachineV1Beta1MachineTemplate, PlatformType,
};
use cpms_common::{Error, Result};

use crate::constants::{DISCRIMINATORS, FAILURE_DOMAINS_PLATFORM_FIELD, PROVIDER_SPEC_VALUE_FIELD};

/// Contract every platform implementation provides
///
/// Values are immutable: injection returns a new value and leaves the
/// receiver untouched. The untyped document is the source of truth for
/// [`raw_config`](Self::raw_config); the typed view is derived from it and
/// is what [`diff`](Self::diff) compares, so a field omitted on one side and
/// set to its default on the other is not drift.
pub trait PlatformProviderConfig: Clone + Sized {
    /// Failure domain type of this platform
    type FailureDomain;

    /// Typed view of the payload
    type Config: Serialize;

    /// Platform this implementation parses
    const PLATFORM: PlatformType;

    /// Provider spec kind this implementation parses
    const KIND: &'static str;

    /// Fields excluded from drift comparison
    const IGNORED_FIELDS: &'static [IgnoredField];

    /// Parse a raw provider spec document
    fn from_document(document: Value) -> Result<Self>;

    /// The raw provider spec document
    fn document(&self) -> &Value;

    /// Typed view of the payload
    fn config(&self) -> &Self::Config;

    /// Return a copy with placement fields overwritten from `failure_domain`
    ///
    /// Coordinates absent on the failure domain keep their current value.
    fn inject_failure_domain(&self, failure_domain: &Self::FailureDomain) -> Result<Self>;

    /// Read the placement fields back as a failure domain
    fn extract_failure_domain(&self) -> Self::FailureDomain;

    /// Paths that differ from `other`, after the ignore-list is applied
    ///
    /// Both sides are compared in their typed form with defaults applied.
    fn diff(&self, other: &Self) -> Result<Vec<String>> {
        let left = self.comparable()?;
        let right = other.comparable()?;
        Ok(document::diff(&left, &right, Self::IGNORED_FIELDS))
    }

    /// The typed view re-serialized, with every defaulted field present
    fn comparable(&self) -> Result<Value> {
        serde_json::to_value(self.config())
            .map_err(|e| Error::serialization_for_kind(Self::KIND, e.to_string()))
    }

    /// Serialize the document in the wire format
    fn raw_config(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self.document())
            .map_err(|e| Error::serialization_for_kind(Self::KIND, e.to_string()))
    }
}

/// Provider config of one machine template, tagged with its platform
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderConfig {
    /// AWS provider config
    Aws(AwsProviderConfig),
    /// Azure provider config
    Azure(AzureProviderConfig),
    /// GCP provider config
    Gcp(GcpProviderConfig),
}

/// Build the provider config for a machine template
///
/// The platform is taken from `failureDomains.platform` when set, otherwise
/// from the provider spec `kind` and API group.
pub fn new_provider_config(
    template: &OpenShiftMachineV1Beta1MachineTemplate,
) -> Result<ProviderConfig> {
    ProviderConfig::from_template(template)
}

/// Determine the platform a machine template describes
///
/// Known platforms without an implementation are returned as-is; only
/// [`new_provider_config`] rejects them.
pub fn platform_type(template: &OpenShiftMachineV1Beta1MachineTemplate) -> Result<PlatformType> {
    detect(template).map(|(platform, _)| platform)
}

fn detect(template: &OpenShiftMachineV1Beta1MachineTemplate) -> Result<(PlatformType, String)> {
    if let Some(platform) = template.failure_domains.as_ref().and_then(|fd| fd.platform) {
        debug!(
            platform = %platform,
            source = FAILURE_DOMAINS_PLATFORM_FIELD,
            "detected platform type"
        );
        return Ok((platform, FAILURE_DOMAINS_PLATFORM_FIELD.to_string()));
    }

    let (platform, discriminator) = discriminate(template.provider_spec_value())?;
    debug!(
        platform = %platform,
        discriminator = %discriminator,
        source = PROVIDER_SPEC_VALUE_FIELD,
        "detected platform type"
    );
    Ok((platform, discriminator))
}

/// Map the `kind` and API group of a raw payload to a platform
fn discriminate(value: Option<&Value>) -> Result<(PlatformType, String)> {
    let value = value.ok_or_else(|| {
        Error::malformed_field(PROVIDER_SPEC_VALUE_FIELD, "provider spec value is missing")
    })?;
    let object = value.as_object().ok_or_else(|| {
        Error::malformed_field(
            PROVIDER_SPEC_VALUE_FIELD,
            "provider spec value must be a JSON object",
        )
    })?;

    let kind = match object.get("kind") {
        Some(Value::String(kind)) if !kind.is_empty() => kind.as_str(),
        Some(Value::String(_)) | None => {
            return Err(Error::malformed_field(
                format!("{PROVIDER_SPEC_VALUE_FIELD}.kind"),
                "kind is missing",
            ))
        }
        Some(other) => {
            return Err(Error::malformed_field(
                format!("{PROVIDER_SPEC_VALUE_FIELD}.kind"),
                format!("kind must be a string, found {other}"),
            ))
        }
    };

    let group = match object.get("apiVersion") {
        None => None,
        Some(Value::String(api_version)) => Some(parse_api_group(api_version)?),
        Some(other) => {
            return Err(Error::malformed_field(
                format!("{PROVIDER_SPEC_VALUE_FIELD}.apiVersion"),
                format!("apiVersion must be a string, found {other}"),
            ))
        }
    };

    let discriminator = match group {
        Some(group) => format!("{group}/{kind}"),
        None => kind.to_string(),
    };

    let known = DISCRIMINATORS
        .iter()
        .find(|d| d.kind == kind && group.map_or(true, |g| d.groups.contains(&g)));
    match known {
        Some(d) => Ok((d.platform, discriminator)),
        None => Err(Error::unsupported_discriminator(discriminator)),
    }
}

/// Extract the group of a `group/version` API version
fn parse_api_group(api_version: &str) -> Result<&str> {
    match api_version.split_once('/') {
        Some((group, version))
            if !group.is_empty() && !version.is_empty() && !version.contains('/') =>
        {
            Ok(group)
        }
        _ => Err(Error::malformed_field(
            format!("{PROVIDER_SPEC_VALUE_FIELD}.apiVersion"),
            format!("apiVersion {api_version:?} is not of the form group/version"),
        )),
    }
}

impl ProviderConfig {
    /// Build the provider config for a machine template
    pub fn from_template(template: &OpenShiftMachineV1Beta1MachineTemplate) -> Result<Self> {
        let (platform, discriminator) = detect(template)?;
        Self::for_platform(platform, &discriminator, template.provider_spec_value())
    }

    /// Build the provider config for a live machine's spec
    ///
    /// Machines carry no failure domain metadata, so the payload
    /// discriminator alone selects the platform.
    pub fn from_machine_spec(spec: &MachineSpec) -> Result<Self> {
        let value = spec.provider_spec.value.as_ref().map(|raw| &raw.0);
        let (platform, discriminator) = discriminate(value)?;
        debug!(
            platform = %platform,
            discriminator = %discriminator,
            "detected platform type of machine"
        );
        Self::for_platform(platform, &discriminator, value)
    }

    fn for_platform(
        platform: PlatformType,
        discriminator: &str,
        value: Option<&Value>,
    ) -> Result<Self> {
        let document = || {
            value.cloned().ok_or_else(|| {
                Error::malformed_for_field(
                    platform,
                    PROVIDER_SPEC_VALUE_FIELD,
                    "provider spec value is missing",
                )
            })
        };

        match platform {
            PlatformType::Aws => AwsProviderConfig::from_document(document()?).map(Self::Aws),
            PlatformType::Azure => AzureProviderConfig::from_document(document()?).map(Self::Azure),
            PlatformType::Gcp => GcpProviderConfig::from_document(document()?).map(Self::Gcp),
            PlatformType::BareMetal
            | PlatformType::Libvirt
            | PlatformType::OpenStack
            | PlatformType::None
            | PlatformType::VSphere
            | PlatformType::Ovirt
            | PlatformType::IbmCloud
            | PlatformType::KubeVirt
            | PlatformType::EquinixMetal
            | PlatformType::PowerVS
            | PlatformType::AlibabaCloud
            | PlatformType::Nutanix
            | PlatformType::External => Err(Error::unsupported_platform(platform, discriminator)),
        }
    }

    /// Platform this config was built for
    pub fn platform_type(&self) -> PlatformType {
        match self {
            Self::Aws(_) => AwsProviderConfig::PLATFORM,
            Self::Azure(_) => AzureProviderConfig::PLATFORM,
            Self::Gcp(_) => GcpProviderConfig::PLATFORM,
        }
    }

    /// Return a copy with placement fields overwritten from `failure_domain`
    pub fn inject_failure_domain(&self, failure_domain: &FailureDomain) -> Result<Self> {
        let injected = match (self, failure_domain) {
            (Self::Aws(config), FailureDomain::Aws(fd)) => {
                config.inject_failure_domain(fd).map(Self::Aws)
            }
            (Self::Azure(config), FailureDomain::Azure(fd)) => {
                config.inject_failure_domain(fd).map(Self::Azure)
            }
            (Self::Gcp(config), FailureDomain::Gcp(fd)) => {
                config.inject_failure_domain(fd).map(Self::Gcp)
            }
            _ => Err(Error::mismatched_platform_types(
                "inject failure domain",
                self.platform_type(),
                failure_domain.platform_type(),
            )),
        }?;

        debug!(
            platform = %self.platform_type(),
            failure_domain = %failure_domain,
            "injected failure domain"
        );
        Ok(injected)
    }

    /// Read the placement fields back as a failure domain
    pub fn extract_failure_domain(&self) -> FailureDomain {
        match self {
            Self::Aws(config) => config.extract_failure_domain().into(),
            Self::Azure(config) => config.extract_failure_domain().into(),
            Self::Gcp(config) => config.extract_failure_domain().into(),
        }
    }

    /// Compare with another config, ignoring fields that do not affect the machine
    pub fn equal(&self, other: &ProviderConfig) -> Result<bool> {
        let diff = self.diff(other)?;
        if !diff.is_empty() {
            debug!(
                platform = %self.platform_type(),
                differences = diff.len(),
                "provider configs differ"
            );
        }
        Ok(diff.is_empty())
    }

    /// Human-readable differences from another config, one entry per path
    pub fn diff(&self, other: &ProviderConfig) -> Result<Vec<String>> {
        let diff = match (self, other) {
            (Self::Aws(a), Self::Aws(b)) => a.diff(b)?,
            (Self::Azure(a), Self::Azure(b)) => a.diff(b)?,
            (Self::Gcp(a), Self::Gcp(b)) => a.diff(b)?,
            _ => {
                return Err(Error::mismatched_platform_types(
                    "compare provider configs",
                    self.platform_type(),
                    other.platform_type(),
                ))
            }
        };

        for entry in &diff {
            trace!(platform = %self.platform_type(), diff = %entry, "provider config drift");
        }
        Ok(diff)
    }

    /// Serialize the provider spec in the wire format
    pub fn raw_config(&self) -> Result<Vec<u8>> {
        match self {
            Self::Aws(config) => config.raw_config(),
            Self::Azure(config) => config.raw_config(),
            Self::Gcp(config) => config.raw_config(),
        }
    }

    /// The raw provider spec document
    pub fn document(&self) -> &Value {
        match self {
            Self::Aws(config) => config.document(),
            Self::Azure(config) => config.document(),
            Self::Gcp(config) => config.document(),
        }
    }

    /// AWS view, if this is an AWS config
    pub fn aws(&self) -> Option<&AwsProviderConfig> {
        match self {
            Self::Aws(config) => Some(config),
            _ => None,
        }
    }

    /// Azure view, if this is an Azure config
    pub fn azure(&self) -> Option<&AzureProviderConfig> {
        match self {
            Self::Azure(config) => Some(config),
            _ => None,
        }
    }

    /// GCP view, if this is a GCP config
    pub fn gcp(&self) -> Option<&GcpProviderConfig> {
        match self {
            Self::Gcp(config) => Some(config),
            _ => None,
        }
    }

    /// Copy of `template` carrying this config as its provider spec
    pub fn apply_to_template(
        &self,
        template: &OpenShiftMachineV1Beta1MachineTemplate,
    ) -> OpenShiftMachineV1Beta1MachineTemplate {
        let mut out = template.clone();
        out.spec.provider_spec.value = Some(RawExtension(self.document().clone()));
        out
    }
}

impl From<AwsProviderConfig> for ProviderConfig {
    fn from(config: AwsProviderConfig) -> Self {
        Self::Aws(config)
    }
}

impl From<AzureProviderConfig> for ProviderConfig {
    fn from(config: AzureProviderConfig) -> Self {
        Self::Azure(config)
    }
}

impl From<GcpProviderConfig> for ProviderConfig {
    fn from(config: GcpProviderConfig) -> Self {
        Self::Gcp(config)
    }
}
