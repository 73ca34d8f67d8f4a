//! Error types for provisioning operations

use thiserror::Error;

use crate::transport::TransportError;

/// Errors that can occur while turning a lifecycle action into a delivered event
#[derive(Debug, Error)]
pub enum ProvisionerError {
    /// Neither transport mode is fully configured
    #[error("invalid configuration: provide either queue config or API config (missing: {})", missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    /// Payload failed structural validation or type resolution
    #[error("validation error: {0}")]
    Validation(String),

    /// Delivery to the control plane failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Resource state could not be read or encoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ProvisionerError {
    /// Shorthand for a validation failure
    pub fn validation(detail: impl Into<String>) -> Self {
        ProvisionerError::Validation(detail.into())
    }

    /// Whether this error should stop every subsequent lifecycle action
    pub fn is_fatal_for_provider(&self) -> bool {
        matches!(self, ProvisionerError::Configuration { .. })
    }
}

/// Result type for provisioning operations
pub type ProvisionerResult<T> = Result<T, ProvisionerError>;

impl From<serde_json::Error> for ProvisionerError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionerError::Serialization(err.to_string())
    }
}
