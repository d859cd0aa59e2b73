//! Transport handles used by schema registry clients.
//!
//! A [`TransportHandle`] accepts the TLS socket factory built for it before
//! being handed to a client. [`TransportSupplier`] produces handles lazily so
//! nothing is constructed until a client is actually requested.

#![warn(missing_docs, clippy::pedantic)]

mod http_client;
mod rest_service;
mod traits;

pub use http_client::HyperClient;
pub use rest_service::{RestService, RestServiceSupplier};
pub use traits::{TransportError, TransportHandle, TransportResult, TransportSupplier};
