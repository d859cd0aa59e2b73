//! Client construction and cache errors.

use registry_config::ConfigError;
use thiserror::Error;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while constructing or using a schema registry client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client parameters were invalid.
    #[error("invalid client configuration: {reason}")]
    InvalidConfig {
        /// Additional context for the failure.
        reason: String,
    },

    /// Authentication settings could not be turned into credentials.
    #[error("invalid registry credentials: {reason}")]
    Credentials {
        /// Additional context for the failure.
        reason: String,
    },

    /// A subject cached more distinct schemas than the client capacity allows.
    #[error("too many schemas cached for subject `{subject}` (capacity {capacity})")]
    CapacityExceeded {
        /// Subject whose cache is full.
        subject: String,
        /// Configured per-subject capacity.
        capacity: usize,
    },

    /// A client factory failed for another reason.
    #[error("client construction failed: {reason}")]
    Construction {
        /// Additional context for the failure.
        reason: String,
    },

    /// A configuration value had the wrong type.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Convenience constructor for invalid client parameters.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for credential failures.
    #[must_use]
    pub fn credentials(reason: impl Into<String>) -> Self {
        Self::Credentials {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for generic factory failures.
    #[must_use]
    pub fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }
}
