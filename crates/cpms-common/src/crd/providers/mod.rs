//! Platform-specific types.
//!
//! Each platform module contains the failure domain API types and a typed
//! view of the platform's raw machine provider spec:
//! - AWS (`AWSMachineProviderConfig`)
//! - Azure (`AzureMachineProviderSpec`)
//! - GCP (`GCPMachineProviderSpec`)

mod aws;
mod azure;
mod gcp;

pub use aws::{
    AwsFailureDomain, AwsFailureDomainPlacement, AwsLoadBalancerReference,
    AwsMachineProviderConfig, AwsMachineResourceReference, AwsPlacement, AwsResourceFilter,
    AwsResourceReference, AwsResourceReferenceType, AwsTagSpecification, SecretReference,
};
pub use azure::{AzureFailureDomain, AzureMachineProviderSpec};
pub use gcp::{GcpFailureDomain, GcpMachineProviderSpec};
