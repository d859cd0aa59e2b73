//! Schema registry client factory.
//!
//! [`RegistryClientFactory::get`] derives the registry's effective
//! configuration from the process-wide [`Config`], builds a TLS context from
//! it, installs the derived socket factory on a freshly supplied transport and
//! hands everything to the injected [`ClientFactory`].

#![warn(missing_docs, clippy::pedantic)]

mod error;

use std::fmt;
use std::sync::Arc;

use registry_client::{CachedClientFactory, ClientFactory};
use registry_config::{Config, SCHEMA_REGISTRY_PREFIX};
use registry_tls::{SslFactory, TlsContextBuilder};
use registry_transport::{RestServiceSupplier, TransportHandle, TransportSupplier};
use tracing::debug;

pub use error::{FactoryError, FactoryResult};

/// Per-subject identity cache size handed to every client.
pub const SCHEMA_REGISTRY_CACHE_CAPACITY: usize = 1000;

/// Orchestrates construction of schema registry clients.
///
/// No state is kept between calls to [`get`](Self::get); each call resolves
/// configuration, builds TLS and obtains a transport afresh.
pub struct RegistryClientFactory<S, B, F> {
    config: Arc<Config>,
    transport_supplier: S,
    ssl_factory: B,
    client_factory: F,
}

impl RegistryClientFactory<RestServiceSupplier, SslFactory, CachedClientFactory> {
    /// Creates a factory wired with the production collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Transport`] when the registry URL setting is
    /// not a string.
    pub fn new(config: Arc<Config>) -> FactoryResult<Self> {
        let transport_supplier = RestServiceSupplier::from_config(&config)?;
        Ok(Self::with_collaborators(
            config,
            transport_supplier,
            SslFactory::new(),
            CachedClientFactory,
        ))
    }
}

impl<S, B, F> RegistryClientFactory<S, B, F>
where
    S: TransportSupplier,
    B: TlsContextBuilder,
    F: ClientFactory<S::Transport>,
{
    /// Creates a factory with explicit collaborators.
    ///
    /// The transport supplier is not invoked until [`get`](Self::get).
    #[must_use]
    pub fn with_collaborators(
        config: Arc<Config>,
        transport_supplier: S,
        ssl_factory: B,
        client_factory: F,
    ) -> Self {
        Self {
            config,
            transport_supplier,
            ssl_factory,
            client_factory,
        }
    }

    /// Returns the configuration snapshot the factory reads from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a new client.
    ///
    /// Steps run in order: resolve the `ksql.schema.registry.` namespace,
    /// configure and build TLS, obtain the transport, install the socket
    /// factory, create the client.
    ///
    /// # Errors
    ///
    /// Any collaborator failure is returned unchanged inside [`FactoryError`];
    /// no client is produced in that case.
    pub fn get(&mut self) -> FactoryResult<<F as ClientFactory<S::Transport>>::Client> {
        let effective = self
            .config
            .values_with_prefix_override(SCHEMA_REGISTRY_PREFIX);

        self.ssl_factory.configure(&effective)?;
        let context = self.ssl_factory.build_context()?;

        let mut transport = self.transport_supplier.obtain()?;
        transport.set_ssl_socket_factory(context.socket_factory());

        debug!(
            keys = ?effective.keys().collect::<Vec<_>>(),
            capacity = SCHEMA_REGISTRY_CACHE_CAPACITY,
            "creating schema registry client"
        );
        let client = self.client_factory.create(
            transport,
            SCHEMA_REGISTRY_CACHE_CAPACITY,
            &effective,
        )?;
        Ok(client)
    }
}

impl<S, B, F> fmt::Debug for RegistryClientFactory<S, B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClientFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
