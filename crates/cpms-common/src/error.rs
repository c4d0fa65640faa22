//! Error types for the provider config layer
//!
//! Errors are structured with fields so the reconciler can report a precise
//! condition on the managed resource. Each variant carries the platform type
//! and, where known, the offending field or discriminator.

use thiserror::Error;

use crate::crd::PlatformType;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Main error type for provider config operations
#[derive(Debug, Error)]
pub enum Error {
    /// The platform is known but has no provider config implementation,
    /// or the payload discriminator maps to no known platform
    #[error("unsupported platform type [{platform}]: discriminator {discriminator}")]
    UnsupportedPlatformType {
        /// Platform type (or "unknown" when the discriminator is unmapped)
        platform: String,
        /// The discriminator that selected the platform (e.g. "machine.openshift.io/OpenstackProviderSpec")
        discriminator: String,
    },

    /// The template or its raw provider spec cannot be parsed
    #[error("malformed template [{platform}]: {message}")]
    MalformedTemplate {
        /// Platform type being parsed (or "unknown" before detection)
        platform: String,
        /// Description of what failed
        message: String,
        /// The offending field path (e.g. "spec.providerSpec.value.kind")
        field: Option<String>,
    },

    /// An operation mixed values tagged for different platforms
    #[error("mismatched platform types in {operation}: expected {expected}, got {actual}")]
    MismatchedPlatformTypes {
        /// Operation that was attempted (e.g. "inject failure domain")
        operation: String,
        /// Platform of the receiver
        expected: PlatformType,
        /// Platform of the argument
        actual: PlatformType,
    },

    /// Serialization of a provider config failed
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The payload kind being serialized (if known)
        kind: Option<String>,
    },
}

impl Error {
    /// Create an unsupported platform error for a platform with no implementation
    pub fn unsupported_platform(platform: PlatformType, discriminator: impl Into<String>) -> Self {
        Self::UnsupportedPlatformType {
            platform: platform.to_string(),
            discriminator: discriminator.into(),
        }
    }

    /// Create an unsupported platform error for a discriminator that maps to no platform
    pub fn unsupported_discriminator(discriminator: impl Into<String>) -> Self {
        Self::UnsupportedPlatformType {
            platform: UNKNOWN_CONTEXT.to_string(),
            discriminator: discriminator.into(),
        }
    }

    /// Create a malformed template error with a field path, before the platform is known
    pub fn malformed_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            platform: UNKNOWN_CONTEXT.to_string(),
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a malformed template error for a specific platform
    pub fn malformed_for(platform: PlatformType, msg: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            platform: platform.to_string(),
            message: msg.into(),
            field: None,
        }
    }

    /// Create a malformed template error for a specific platform and field path
    pub fn malformed_for_field(
        platform: PlatformType,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::MalformedTemplate {
            platform: platform.to_string(),
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a mismatched platform types error
    pub fn mismatched_platform_types(
        operation: impl Into<String>,
        expected: PlatformType,
        actual: PlatformType,
    ) -> Self {
        Self::MismatchedPlatformTypes {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    /// Create a serialization error with payload kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }

    /// Get the platform this error is associated with
    ///
    /// For mismatches this is the receiver's platform.
    pub fn platform(&self) -> Option<String> {
        match self {
            Error::UnsupportedPlatformType { platform, .. } => Some(platform.clone()),
            Error::MalformedTemplate { platform, .. } => Some(platform.clone()),
            Error::MismatchedPlatformTypes { expected, .. } => Some(expected.to_string()),
            Error::Serialization { .. } => None,
        }
    }

    /// Get the offending field path if one is known
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::MalformedTemplate { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Stable CamelCase reason, suitable for a condition on the managed resource
    pub fn reason(&self) -> &'static str {
        match self {
            Error::UnsupportedPlatformType { .. } => "UnsupportedPlatformType",
            Error::MalformedTemplate { .. } => "MalformedTemplate",
            Error::MismatchedPlatformTypes { .. } => "MismatchedPlatformTypes",
            Error::Serialization { .. } => "SerializationFailed",
        }
    }
}
