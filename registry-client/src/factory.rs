use registry_config::EffectiveConfig;
use registry_transport::RestService;
use tracing::debug;

use crate::{CachedSchemaRegistryClient, ClientResult};

/// Strategy producing a client from a prepared transport handle.
///
/// `capacity` bounds client-side caching and is fixed by the caller.
/// Closures with the matching signature implement this trait, which keeps
/// test doubles cheap to write.
pub trait ClientFactory<T> {
    /// Client type produced by the factory.
    type Client;

    /// Creates a client that takes ownership of `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed.
    fn create(
        &self,
        transport: T,
        capacity: usize,
        config: &EffectiveConfig,
    ) -> ClientResult<Self::Client>;
}

impl<F, T, C> ClientFactory<T> for F
where
    F: Fn(T, usize, &EffectiveConfig) -> ClientResult<C>,
{
    type Client = C;

    fn create(&self, transport: T, capacity: usize, config: &EffectiveConfig) -> ClientResult<C> {
        self(transport, capacity, config)
    }
}

/// Factory producing [`CachedSchemaRegistryClient`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct CachedClientFactory;

impl ClientFactory<RestService> for CachedClientFactory {
    type Client = CachedSchemaRegistryClient;

    fn create(
        &self,
        transport: RestService,
        capacity: usize,
        config: &EffectiveConfig,
    ) -> ClientResult<CachedSchemaRegistryClient> {
        let client = CachedSchemaRegistryClient::new(transport, capacity, config)?;
        debug!(
            capacity,
            auth = client.credentials().map_or("none", |c| c.scheme()),
            tls = client.rest_service().ssl_socket_factory().is_some(),
            "created cached schema registry client"
        );
        Ok(client)
    }
}
