//! Machine template as embedded in a ControlPlaneMachineSet
//!
//! The provider spec payload is opaque here: a [`RawExtension`] holding the
//! platform's machine provider spec document. Platform code parses it.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::runtime::RawExtension;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::failure_domain::FailureDomains;

/// Template for control plane machines built from the machine.openshift.io/v1beta1 API
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftMachineV1Beta1MachineTemplate {
    /// Failure domains machines may be spread across
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_domains: Option<FailureDomains>,

    /// Labels and annotations applied to created machines
    #[serde(default)]
    pub metadata: ControlPlaneMachineSetTemplateObjectMeta,

    /// Machine spec
    pub spec: MachineSpec,
}

impl OpenShiftMachineV1Beta1MachineTemplate {
    /// Template with the given provider spec payload and no failure domains
    pub fn new(provider_spec: serde_json::Value) -> Self {
        Self {
            failure_domains: None,
            metadata: ControlPlaneMachineSetTemplateObjectMeta::default(),
            spec: MachineSpec::with_provider_spec(provider_spec),
        }
    }

    /// Set the failure domains
    pub fn with_failure_domains(mut self, failure_domains: FailureDomains) -> Self {
        self.failure_domains = Some(failure_domains);
        self
    }

    /// The raw provider spec payload, if present
    pub fn provider_spec_value(&self) -> Option<&serde_json::Value> {
        self.spec.provider_spec.value.as_ref().map(|raw| &raw.0)
    }
}

/// Object metadata carried by a machine template
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ControlPlaneMachineSetTemplateObjectMeta {
    /// Labels applied to created machines
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Annotations applied to created machines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Machine spec (the subset the provider config layer reads)
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Platform-specific machine configuration
    #[serde(default)]
    pub provider_spec: ProviderSpec,

    /// Cloud provider ID of a live machine
    #[serde(default, rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

impl MachineSpec {
    /// Machine spec wrapping a provider spec payload
    pub fn with_provider_spec(value: serde_json::Value) -> Self {
        Self {
            provider_spec: ProviderSpec {
                value: Some(RawExtension(value)),
            },
            provider_id: None,
        }
    }
}

/// Opaque platform-specific provider spec
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ProviderSpec {
    /// Raw provider spec document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawExtension>,
}
