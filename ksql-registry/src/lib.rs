//! Schema registry client construction for ksql deployments.
//!
//! Depend on this crate to get every component behind feature flags. The
//! configuration layer is always available; TLS, transport, client and the
//! orchestrating factory can be trimmed for embedded uses.

#![warn(missing_docs, clippy::pedantic)]

/// Layered configuration and prefix resolution.
pub use registry_config as config;

/// TLS context construction (enabled by `tls` feature).
#[cfg(feature = "tls")]
pub use registry_tls as tls;

/// REST transport handles (enabled by `transport` feature).
#[cfg(feature = "transport")]
pub use registry_transport as transport;

/// Caching registry client (enabled by `client` feature).
#[cfg(feature = "client")]
pub use registry_client as client;

/// Client orchestration (enabled by `factory` feature).
#[cfg(feature = "factory")]
pub use registry_factory as factory;

/// Subscriber installation (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use registry_telemetry as telemetry;

#[cfg(feature = "factory")]
pub use registry_factory::{RegistryClientFactory, SCHEMA_REGISTRY_CACHE_CAPACITY};
pub use registry_config::{Config, EffectiveConfig, SCHEMA_REGISTRY_PREFIX};
