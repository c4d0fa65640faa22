//! GCP provider config

use serde_json::Value;

use cpms_common::crd::{GcpFailureDomain, GcpMachineProviderSpec, PlatformType};
use cpms_common::Result;

use super::document::{parse_typed, set_path, IgnoredField};
use super::PlatformProviderConfig;
use crate::constants::{GCP_IGNORED_FIELDS, GCP_PROVIDER_SPEC_KIND};

/// Provider config parsed from a `GCPMachineProviderSpec` payload
#[derive(Clone, Debug, PartialEq)]
pub struct GcpProviderConfig {
    document: Value,
    config: GcpMachineProviderSpec,
}

impl PlatformProviderConfig for GcpProviderConfig {
    type FailureDomain = GcpFailureDomain;
    type Config = GcpMachineProviderSpec;

    const PLATFORM: PlatformType = PlatformType::Gcp;
    const KIND: &'static str = GCP_PROVIDER_SPEC_KIND;
    const IGNORED_FIELDS: &'static [IgnoredField] = GCP_IGNORED_FIELDS;

    fn from_document(document: Value) -> Result<Self> {
        let config = parse_typed(Self::PLATFORM, Self::KIND, &document)?;
        Ok(Self { document, config })
    }

    fn document(&self) -> &Value {
        &self.document
    }

    fn config(&self) -> &GcpMachineProviderSpec {
        &self.config
    }

    fn inject_failure_domain(&self, failure_domain: &GcpFailureDomain) -> Result<Self> {
        let mut document = self.document.clone();
        if !failure_domain.zone.is_empty() {
            set_path(&mut document, &["zone"], Value::String(failure_domain.zone.clone()));
        }
        Self::from_document(document)
    }

    fn extract_failure_domain(&self) -> GcpFailureDomain {
        GcpFailureDomain::new(self.config.zone.clone())
    }
}
