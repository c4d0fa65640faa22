//! Centralized constants for the cpms-provider crate
//!
//! Discriminator table, payload kinds and drift ignore-lists live here so
//! every platform implementation reads the same policy.

use cpms_common::crd::PlatformType;

use crate::provider::IgnoredField;

// =============================================================================
// API Groups and Kinds
// =============================================================================

/// Machine API group shared by every platform's v1beta1 provider spec
pub const MACHINE_API_GROUP: &str = "machine.openshift.io";

/// Kind of the AWS machine provider spec
pub const AWS_PROVIDER_CONFIG_KIND: &str = "AWSMachineProviderConfig";

/// Kind of the Azure machine provider spec
pub const AZURE_PROVIDER_SPEC_KIND: &str = "AzureMachineProviderSpec";

/// Kind of the GCP machine provider spec
pub const GCP_PROVIDER_SPEC_KIND: &str = "GCPMachineProviderSpec";

// =============================================================================
// Field Paths (used in error context)
// =============================================================================

/// Path of the raw provider spec payload within a machine template
pub const PROVIDER_SPEC_VALUE_FIELD: &str = "spec.providerSpec.value";

/// Path of the explicit platform tag within a machine template
pub const FAILURE_DOMAINS_PLATFORM_FIELD: &str = "failureDomains.platform";

/// Path of an AWS failure domain's subnet reference
pub const AWS_FAILURE_DOMAIN_SUBNET_FIELD: &str = "failureDomains.aws.subnet";

// =============================================================================
// Platform Discriminators
// =============================================================================

/// Maps a provider spec `kind` (and its accepted API groups) to a platform
#[derive(Clone, Copy, Debug)]
pub struct Discriminator {
    /// Provider spec kind
    pub kind: &'static str,
    /// API groups the kind may be served from
    pub groups: &'static [&'static str],
    /// Platform the kind belongs to
    pub platform: PlatformType,
}

/// Every provider spec kind the operator recognises
///
/// Recognised is not the same as supported: kinds for platforms without a
/// provider config implementation are listed so they fail as unsupported
/// with their platform named.
pub const DISCRIMINATORS: &[Discriminator] = &[
    Discriminator {
        kind: AWS_PROVIDER_CONFIG_KIND,
        groups: &[MACHINE_API_GROUP, "awsproviderconfig.openshift.io"],
        platform: PlatformType::Aws,
    },
    Discriminator {
        kind: AZURE_PROVIDER_SPEC_KIND,
        groups: &[MACHINE_API_GROUP, "azureproviderconfig.openshift.io"],
        platform: PlatformType::Azure,
    },
    Discriminator {
        kind: GCP_PROVIDER_SPEC_KIND,
        groups: &[MACHINE_API_GROUP, "gcpprovider.openshift.io"],
        platform: PlatformType::Gcp,
    },
    Discriminator {
        kind: "OpenstackProviderSpec",
        groups: &[MACHINE_API_GROUP, "openstackproviderconfig.openshift.io"],
        platform: PlatformType::OpenStack,
    },
    Discriminator {
        kind: "VSphereMachineProviderSpec",
        groups: &[MACHINE_API_GROUP, "vsphereprovider.openshift.io"],
        platform: PlatformType::VSphere,
    },
    Discriminator {
        kind: "NutanixMachineProviderConfig",
        groups: &[MACHINE_API_GROUP],
        platform: PlatformType::Nutanix,
    },
    Discriminator {
        kind: "PowerVSMachineProviderConfig",
        groups: &[MACHINE_API_GROUP],
        platform: PlatformType::PowerVS,
    },
    Discriminator {
        kind: "IBMCloudMachineProviderSpec",
        groups: &[MACHINE_API_GROUP, "ibmcloudproviderconfig.openshift.io"],
        platform: PlatformType::IbmCloud,
    },
    Discriminator {
        kind: "AlibabaCloudMachineProviderConfig",
        groups: &[MACHINE_API_GROUP],
        platform: PlatformType::AlibabaCloud,
    },
];

// =============================================================================
// Drift Ignore-Lists
// =============================================================================

/// Object metadata fields the API server generates inside a payload
pub const GENERATED_METADATA_FIELDS: &[IgnoredField] = &[
    IgnoredField::Always("metadata.creationTimestamp"),
    IgnoredField::Always("metadata.resourceVersion"),
    IgnoredField::Always("metadata.uid"),
    IgnoredField::Always("metadata.generation"),
    IgnoredField::Always("metadata.managedFields"),
    IgnoredField::Always("metadata.selfLink"),
];

/// AWS: generated metadata plus the instance profile ID resolved by the
/// machine controller when the profile is referenced by ARN or filters
pub const AWS_IGNORED_FIELDS: &[IgnoredField] = &[
    // GENERATED_METADATA_FIELDS; slices cannot be concatenated in a const
    IgnoredField::Always("metadata.creationTimestamp"),
    IgnoredField::Always("metadata.resourceVersion"),
    IgnoredField::Always("metadata.uid"),
    IgnoredField::Always("metadata.generation"),
    IgnoredField::Always("metadata.managedFields"),
    IgnoredField::Always("metadata.selfLink"),
    IgnoredField::ResolvedFrom {
        path: "iamInstanceProfile.id",
        sources: &["iamInstanceProfile.arn", "iamInstanceProfile.filters"],
    },
];

/// Azure: generated metadata only
pub const AZURE_IGNORED_FIELDS: &[IgnoredField] = GENERATED_METADATA_FIELDS;

/// GCP: generated metadata only
pub const GCP_IGNORED_FIELDS: &[IgnoredField] = GENERATED_METADATA_FIELDS;
