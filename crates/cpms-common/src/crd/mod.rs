//! API types consumed by the provider config layer
//!
//! These mirror the machine.openshift.io APIs a ControlPlaneMachineSet embeds:
//! the machine template, its failure domains, and the per-platform payloads.

mod failure_domain;
mod machine_template;
mod providers;
mod types;

pub use failure_domain::{FailureDomain, FailureDomains};
pub use machine_template::{
    ControlPlaneMachineSetTemplateObjectMeta, MachineSpec, OpenShiftMachineV1Beta1MachineTemplate,
    ProviderSpec,
};
pub use providers::{
    AwsFailureDomain, AwsFailureDomainPlacement, AwsLoadBalancerReference,
    AwsMachineProviderConfig, AwsMachineResourceReference, AwsPlacement, AwsResourceFilter,
    AwsResourceReference, AwsResourceReferenceType, AwsTagSpecification, AzureFailureDomain,
    AzureMachineProviderSpec, GcpFailureDomain, GcpMachineProviderSpec, SecretReference,
};
pub use types::PlatformType;
