//! Provider configs for control-plane machine templates
//!
//! Normalizes each platform's machine provider spec behind one interface:
//! platform detection, failure domain injection and extraction, drift
//! comparison, and lossless re-serialization.

#![deny(missing_docs)]

pub mod constants;
pub mod provider;

pub use provider::{
    new_provider_config, platform_type, AwsProviderConfig, AzureProviderConfig,
    GcpProviderConfig, IgnoredField, PlatformProviderConfig, ProviderConfig,
};
