//! Error definitions for configuration loading and typed lookups.

use std::path::PathBuf;

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A properties document contained a malformed line.
    #[error("invalid properties entry on line {line}: {reason}")]
    Parse {
        /// One-based line number of the offending entry.
        line: usize,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A JSON document could not be decoded into a configuration map.
    #[error("invalid JSON configuration: {source}")]
    Json {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },

    /// A value was present but did not have the expected shape.
    #[error("configuration key `{key}` is not a valid {expected}")]
    InvalidValue {
        /// Key whose value was rejected.
        key: String,
        /// Description of the expected type.
        expected: &'static str,
    },
}

impl ConfigError {
    /// Convenience constructor for typed lookup failures.
    #[must_use]
    pub fn invalid_value(key: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            key: key.into(),
            expected,
        }
    }
}
