//! Schema registry clients and the factories that construct them.
//!
//! [`ClientFactory`] is the injection point between the client factory
//! orchestrator and concrete clients: production code uses
//! [`CachedClientFactory`], tests substitute closures or recording doubles.

#![warn(missing_docs, clippy::pedantic)]

mod client;
mod credentials;
mod error;
mod factory;

pub use client::{CachedSchemaRegistryClient, RegisteredSchema, SchemaType};
pub use credentials::{Credentials, keys};
pub use error::{ClientError, ClientResult};
pub use factory::{CachedClientFactory, ClientFactory};
