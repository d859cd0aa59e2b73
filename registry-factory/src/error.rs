use registry_client::ClientError;
use registry_tls::TlsError;
use registry_transport::TransportError;
use thiserror::Error;

/// Result alias for [`crate::RegistryClientFactory`].
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Failure of one of the collaborators used to build a client.
///
/// Each variant carries the collaborator's error untouched.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The TLS builder rejected its configuration or failed to build.
    #[error(transparent)]
    Tls(#[from] TlsError),
    /// The transport handle could not be obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The client factory failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}
