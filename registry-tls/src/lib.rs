//! TLS context construction for schema registry transports.
//!
//! [`TlsContextBuilder`] is the two-phase seam consumed by the client factory:
//! it is configured with a resolved [`registry_config::EffectiveConfig`] and
//! then asked for a [`TlsContext`]. [`SslFactory`] is the rustls-backed
//! implementation reading the `ssl.*` keys.

#![warn(missing_docs, clippy::pedantic)]

mod builder;
mod context;
mod error;
mod pem;
mod ssl_factory;

pub use builder::TlsContextBuilder;
pub use context::{SslSocketFactory, TlsContext, default_client_config};
pub use error::{TlsError, TlsResult};
pub use ssl_factory::{SslFactory, SslSettings, keys};
