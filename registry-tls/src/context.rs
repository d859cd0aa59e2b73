//! TLS contexts and the socket factories derived from them.

use std::fmt;
use std::sync::Arc;

use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use webpki_roots::TLS_SERVER_ROOTS;

/// Client-side TLS context produced by a [`crate::TlsContextBuilder`].
#[derive(Clone)]
pub struct TlsContext {
    config: Arc<ClientConfig>,
}

impl TlsContext {
    /// Wraps an assembled rustls client configuration.
    #[must_use]
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    /// Returns the underlying rustls configuration.
    #[must_use]
    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }

    /// Returns `true` when the context presents a client certificate.
    #[must_use]
    pub fn has_client_auth(&self) -> bool {
        self.config.client_auth_cert_resolver.has_certs()
    }

    /// Derives the socket factory transports use to open TLS connections.
    #[must_use]
    pub fn socket_factory(&self) -> SslSocketFactory {
        SslSocketFactory {
            config: Arc::clone(&self.config),
        }
    }
}

impl fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsContext")
            .field("client_auth", &self.has_client_auth())
            .finish_non_exhaustive()
    }
}

/// Socket factory installed on a transport handle.
///
/// Shares the rustls configuration of the [`TlsContext`] it was derived from.
#[derive(Clone)]
pub struct SslSocketFactory {
    config: Arc<ClientConfig>,
}

impl SslSocketFactory {
    /// Returns the rustls configuration used for new connections.
    #[must_use]
    pub fn tls_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }

    /// Returns `true` if this factory was derived from `context`.
    #[must_use]
    pub fn derived_from(&self, context: &TlsContext) -> bool {
        Arc::ptr_eq(&self.config, &context.config)
    }
}

impl fmt::Debug for SslSocketFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslSocketFactory").finish_non_exhaustive()
    }
}

pub(crate) fn webpki_root_store() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));
    roots
}

/// Client configuration trusting the Mozilla root set, without client auth.
#[must_use]
pub fn default_client_config() -> ClientConfig {
    ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(webpki_root_store())
        .with_no_client_auth()
}
