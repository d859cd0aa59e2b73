//! Errors raised while preparing TLS contexts.

use std::path::PathBuf;

use registry_config::ConfigError;
use rustls_pki_types::pem::Error as PemError;
use thiserror::Error;

/// Result alias for TLS operations.
pub type TlsResult<T> = Result<T, TlsError>;

/// Error type shared by TLS builders.
#[derive(Debug, Error)]
pub enum TlsError {
    /// `build_context` was called before a successful `configure`.
    #[error("TLS builder used before it was configured")]
    NotConfigured,

    /// TLS settings were inconsistent or unsupported.
    #[error("invalid TLS configuration: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// A protocol name could not be mapped to a supported TLS version.
    #[error("unsupported TLS protocol `{protocol}`")]
    UnsupportedProtocol {
        /// Protocol name as configured.
        protocol: String,
    },

    /// A key or trust store used a format other than PEM.
    #[error("unsupported store type `{store_type}` for `{key}`")]
    UnsupportedStoreType {
        /// Configuration key naming the store type.
        key: &'static str,
        /// Store type as configured.
        store_type: String,
    },

    /// Key material could not be read from disk.
    #[error("failed to read TLS material from {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Key material was not valid PEM.
    #[error("invalid PEM material in {origin}: {source}")]
    Pem {
        /// Where the material came from (path or configuration key).
        origin: String,
        /// Source parser error.
        source: PemError,
    },

    /// A certificate was rejected by the trust store.
    #[error("invalid certificate in {origin}: {reason}")]
    InvalidCertificate {
        /// Where the certificate came from.
        origin: String,
        /// Reason reported by rustls.
        reason: String,
    },

    /// rustls refused the assembled configuration.
    #[error("rustls rejected TLS configuration: {source}")]
    Rustls {
        /// Source [`rustls::Error`].
        #[from]
        source: rustls::Error,
    },

    /// A configuration value had the wrong type.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TlsError {
    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
