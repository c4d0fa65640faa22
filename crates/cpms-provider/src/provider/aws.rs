//! AWS provider config
//!
//! Placement lives in `placement.availabilityZone` and `subnet`. Injection
//! rewrites those two fields in the raw document and nothing else, so the
//! serialized payload differs from the input only where the failure domain
//! says it should.

use serde_json::Value;

use cpms_common::crd::{
    AwsFailureDomain, AwsFailureDomainPlacement, AwsMachineProviderConfig,
    AwsMachineResourceReference, PlatformType,
};
use cpms_common::{Error, Result};

use super::document::{parse_typed, set_path, IgnoredField};
use super::PlatformProviderConfig;
use crate::constants::{
    AWS_FAILURE_DOMAIN_SUBNET_FIELD, AWS_IGNORED_FIELDS, AWS_PROVIDER_CONFIG_KIND,
};

/// Provider config parsed from an `AWSMachineProviderConfig` payload
#[derive(Clone, Debug, PartialEq)]
pub struct AwsProviderConfig {
    document: Value,
    config: AwsMachineProviderConfig,
}

impl PlatformProviderConfig for AwsProviderConfig {
    type FailureDomain = AwsFailureDomain;
    type Config = AwsMachineProviderConfig;

    const PLATFORM: PlatformType = PlatformType::Aws;
    const KIND: &'static str = AWS_PROVIDER_CONFIG_KIND;
    const IGNORED_FIELDS: &'static [IgnoredField] = AWS_IGNORED_FIELDS;

    fn from_document(document: Value) -> Result<Self> {
        let config = parse_typed(Self::PLATFORM, Self::KIND, &document)?;
        Ok(Self { document, config })
    }

    fn document(&self) -> &Value {
        &self.document
    }

    fn config(&self) -> &AwsMachineProviderConfig {
        &self.config
    }

    /// Rejects a subnet reference whose selected field is unset or empty,
    /// since writing it would clear the template's subnet.
    fn inject_failure_domain(&self, failure_domain: &AwsFailureDomain) -> Result<Self> {
        let mut document = self.document.clone();

        let zone = &failure_domain.placement.availability_zone;
        if !zone.is_empty() {
            set_path(
                &mut document,
                &["placement", "availabilityZone"],
                Value::String(zone.clone()),
            );
        }

        if let Some(subnet) = &failure_domain.subnet {
            let reference = AwsMachineResourceReference::from(subnet);
            if reference.is_empty() {
                return Err(Error::malformed_for_field(
                    Self::PLATFORM,
                    AWS_FAILURE_DOMAIN_SUBNET_FIELD,
                    format!("subnet reference {subnet} selects no resource"),
                ));
            }
            let reference = serde_json::to_value(reference)
                .map_err(|e| Error::serialization_for_kind(Self::KIND, e.to_string()))?;
            set_path(&mut document, &["subnet"], reference);
        }

        Self::from_document(document)
    }

    /// Reports the subnet as well as the zone. A failure domain that names
    /// only a zone therefore extracts with the template's subnet filled in;
    /// compare against [`FailureDomain::complete`] of the injected value.
    ///
    /// [`FailureDomain::complete`]: cpms_common::crd::FailureDomain::complete
    fn extract_failure_domain(&self) -> AwsFailureDomain {
        AwsFailureDomain {
            placement: AwsFailureDomainPlacement {
                availability_zone: self.config.placement.availability_zone.clone(),
            },
            subnet: self.config.subnet.to_failure_domain_reference(),
        }
    }
}
