//! Transport seams shared by production handles and test doubles.

use registry_config::ConfigError;
use registry_tls::SslSocketFactory;
use thiserror::Error;

/// Result alias used by transports.
pub type TransportResult<T> = Result<T, TransportError>;

/// Error type shared by transport implementations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No base URL was configured.
    #[error("no schema registry URLs configured")]
    NoBaseUrls,

    /// A configured base URL could not be used.
    #[error("invalid schema registry URL `{url}`: {reason}")]
    InvalidUrl {
        /// The offending URL as configured.
        url: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A configuration value had the wrong type.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TransportError {
    /// Convenience constructor for URL validation failures.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Transport endpoint that can be switched to TLS before use.
pub trait TransportHandle {
    /// Installs the socket factory used for TLS connections.
    fn set_ssl_socket_factory(&mut self, factory: SslSocketFactory);
}

/// Zero-argument supplier of transport handles.
///
/// Each call to [`obtain`](Self::obtain) produces a fresh handle.
pub trait TransportSupplier {
    /// Handle type produced by this supplier.
    type Transport: TransportHandle;

    /// Produces a transport handle.
    ///
    /// # Errors
    ///
    /// Returns an error when the handle cannot be constructed.
    fn obtain(&self) -> TransportResult<Self::Transport>;
}

impl<F, T> TransportSupplier for F
where
    F: Fn() -> TransportResult<T>,
    T: TransportHandle,
{
    type Transport = T;

    fn obtain(&self) -> TransportResult<T> {
        self()
    }
}
