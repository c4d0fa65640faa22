//! Azure provider config
//!
//! Placement lives in the top-level `zone` and `subnet` fields.

use serde_json::Value;

use cpms_common::crd::{AzureFailureDomain, AzureMachineProviderSpec, PlatformType};
use cpms_common::Result;

use super::document::{parse_typed, set_path, IgnoredField};
use super::PlatformProviderConfig;
use crate::constants::{AZURE_IGNORED_FIELDS, AZURE_PROVIDER_SPEC_KIND};

/// Provider config parsed from an `AzureMachineProviderSpec` payload
#[derive(Clone, Debug, PartialEq)]
pub struct AzureProviderConfig {
    document: Value,
    config: AzureMachineProviderSpec,
}

impl PlatformProviderConfig for AzureProviderConfig {
    type FailureDomain = AzureFailureDomain;
    type Config = AzureMachineProviderSpec;

    const PLATFORM: PlatformType = PlatformType::Azure;
    const KIND: &'static str = AZURE_PROVIDER_SPEC_KIND;
    const IGNORED_FIELDS: &'static [IgnoredField] = AZURE_IGNORED_FIELDS;

    fn from_document(document: Value) -> Result<Self> {
        let config = parse_typed(Self::PLATFORM, Self::KIND, &document)?;
        Ok(Self { document, config })
    }

    fn document(&self) -> &Value {
        &self.document
    }

    fn config(&self) -> &AzureMachineProviderSpec {
        &self.config
    }

    fn inject_failure_domain(&self, failure_domain: &AzureFailureDomain) -> Result<Self> {
        let mut document = self.document.clone();
        if !failure_domain.zone.is_empty() {
            set_path(&mut document, &["zone"], Value::String(failure_domain.zone.clone()));
        }
        if let Some(subnet) = failure_domain.subnet.as_ref().filter(|s| !s.is_empty()) {
            set_path(&mut document, &["subnet"], Value::String(subnet.clone()));
        }
        Self::from_document(document)
    }

    fn extract_failure_domain(&self) -> AzureFailureDomain {
        AzureFailureDomain {
            zone: self.config.zone.clone().unwrap_or_default(),
            subnet: Some(self.config.subnet.clone()).filter(|s| !s.is_empty()),
        }
    }
}
