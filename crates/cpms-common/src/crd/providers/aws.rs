//! AWS failure domain and machine provider spec types
//!
//! Two shapes of subnet reference exist on the wire: the failure domain API
//! uses a discriminated reference (`type: ID|ARN|Filters`), while the raw
//! `AWSMachineProviderConfig` payload uses a plain struct where whichever
//! field is set wins. Conversions between the two live here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Failure domain API
// =============================================================================

/// AWS failure domain: an availability zone plus an optional subnet
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsFailureDomain {
    /// Placement of the machine
    pub placement: AwsFailureDomainPlacement,

    /// Subnet the machine should be created in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<AwsResourceReference>,
}

impl AwsFailureDomain {
    /// Failure domain pinned to an availability zone only
    pub fn new(availability_zone: impl Into<String>) -> Self {
        Self {
            placement: AwsFailureDomainPlacement {
                availability_zone: availability_zone.into(),
            },
            subnet: None,
        }
    }

    /// Set the subnet reference
    pub fn with_subnet(mut self, subnet: AwsResourceReference) -> Self {
        self.subnet = Some(subnet);
        self
    }
}

impl std::fmt::Display for AwsFailureDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AWSFailureDomain{{AvailabilityZone:{}",
            self.placement.availability_zone
        )?;
        if let Some(subnet) = &self.subnet {
            write!(f, ", Subnet:{subnet}")?;
        }
        f.write_str("}")
    }
}

/// Placement coordinates of an AWS failure domain
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsFailureDomainPlacement {
    /// Availability zone (e.g. "us-east-1a")
    pub availability_zone: String,
}

/// How an [`AwsResourceReference`] identifies its resource
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum AwsResourceReferenceType {
    /// Reference by resource ID
    #[default]
    #[serde(rename = "ID")]
    Id,
    /// Reference by ARN
    #[serde(rename = "ARN")]
    Arn,
    /// Reference by tag/attribute filters
    Filters,
}

/// Discriminated reference to an AWS resource
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsResourceReference {
    /// Which of the fields below identifies the resource
    #[serde(rename = "type")]
    pub type_: AwsResourceReferenceType,

    /// Resource ID (when type is ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Resource ARN (when type is ARN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Filters (when type is Filters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<AwsResourceFilter>>,
}

impl AwsResourceReference {
    /// Reference by ID
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            type_: AwsResourceReferenceType::Id,
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Reference by ARN
    pub fn arn(arn: impl Into<String>) -> Self {
        Self {
            type_: AwsResourceReferenceType::Arn,
            arn: Some(arn.into()),
            ..Default::default()
        }
    }

    /// Reference by filters
    pub fn filters(filters: Vec<AwsResourceFilter>) -> Self {
        Self {
            type_: AwsResourceReferenceType::Filters,
            filters: Some(filters),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for AwsResourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.type_ {
            AwsResourceReferenceType::Id => {
                write!(f, "{{Type:ID, Value:{}}}", self.id.as_deref().unwrap_or(""))
            }
            AwsResourceReferenceType::Arn => {
                write!(f, "{{Type:ARN, Value:{}}}", self.arn.as_deref().unwrap_or(""))
            }
            AwsResourceReferenceType::Filters => {
                f.write_str("{Type:Filters, Value:[")?;
                for (i, filter) in self.filters.iter().flatten().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(
                        f,
                        "{{Name:{}, Values:[{}]}}",
                        filter.name,
                        filter.values.join(" ")
                    )?;
                }
                f.write_str("]}")
            }
        }
    }
}

/// Filter selecting AWS resources by name/values
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsResourceFilter {
    /// Filter name (e.g. "tag:Name")
    pub name: String,

    /// Values to match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl AwsResourceFilter {
    /// Create a filter
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

// =============================================================================
// Raw machine provider spec (machine.openshift.io/v1beta1 AWSMachineProviderConfig)
// =============================================================================

/// Typed view of an `AWSMachineProviderConfig` payload
///
/// Fields this layer does not interpret are kept in `extra`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AwsMachineProviderConfig {
    /// API version (e.g. "machine.openshift.io/v1beta1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Kind, always "AWSMachineProviderConfig" when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// AMI to boot from
    #[serde(default)]
    pub ami: AwsMachineResourceReference,

    /// EC2 instance type (e.g. "m6i.xlarge")
    #[serde(default)]
    pub instance_type: String,

    /// Tags applied to the instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<AwsTagSpecification>,

    /// IAM instance profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<AwsMachineResourceReference>,

    /// Secret holding the instance user data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data_secret: Option<SecretReference>,

    /// Secret holding the AWS credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_secret: Option<SecretReference>,

    /// SSH key pair name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,

    /// Network interface device index
    #[serde(default)]
    pub device_index: i64,

    /// Whether to assign a public IP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip: Option<bool>,

    /// Security groups attached to the instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<AwsMachineResourceReference>,

    /// Subnet the instance is created in
    #[serde(default)]
    pub subnet: AwsMachineResourceReference,

    /// Region and availability zone
    #[serde(default)]
    pub placement: AwsPlacement,

    /// Load balancers the instance is registered with
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancers: Vec<AwsLoadBalancerReference>,

    /// Block device mappings (kept untyped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_devices: Vec<serde_json::Value>,

    /// Fields not interpreted by this layer
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Plain AWS resource reference used inside the raw payload
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsMachineResourceReference {
    /// Resource ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Resource ARN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Filters selecting the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<AwsResourceFilter>>,
}

impl AwsMachineResourceReference {
    /// Returns true if no field identifies a resource
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.arn.is_none()
            && self.filters.as_ref().map_or(true, Vec::is_empty)
    }

    /// Convert to the failure domain form. ID wins over ARN, ARN over filters.
    pub fn to_failure_domain_reference(&self) -> Option<AwsResourceReference> {
        if let Some(id) = &self.id {
            return Some(AwsResourceReference::id(id.clone()));
        }
        if let Some(arn) = &self.arn {
            return Some(AwsResourceReference::arn(arn.clone()));
        }
        match &self.filters {
            Some(filters) if !filters.is_empty() => {
                Some(AwsResourceReference::filters(filters.clone()))
            }
            _ => None,
        }
    }
}

impl From<&AwsResourceReference> for AwsMachineResourceReference {
    fn from(reference: &AwsResourceReference) -> Self {
        match reference.type_ {
            AwsResourceReferenceType::Id => Self {
                id: reference.id.clone(),
                ..Default::default()
            },
            AwsResourceReferenceType::Arn => Self {
                arn: reference.arn.clone(),
                ..Default::default()
            },
            AwsResourceReferenceType::Filters => Self {
                filters: reference.filters.clone(),
                ..Default::default()
            },
        }
    }
}

/// Instance placement inside the raw payload
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AwsPlacement {
    /// Region (e.g. "us-east-1")
    #[serde(default)]
    pub region: String,

    /// Availability zone (e.g. "us-east-1a")
    #[serde(default)]
    pub availability_zone: String,

    /// Instance tenancy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<String>,
}

/// Tag applied to an instance
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AwsTagSpecification {
    /// Tag key
    pub name: String,
    /// Tag value
    pub value: String,
}

/// Load balancer registration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AwsLoadBalancerReference {
    /// Load balancer name
    pub name: String,
    /// Load balancer type ("classic" or "network")
    #[serde(rename = "type")]
    pub type_: String,
}

/// Reference to a secret in the machine's namespace
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SecretReference {
    /// Secret name
    #[serde(default)]
    pub name: String,
}
