//! Configuration management for the schema registry client factory.
//!
//! A [`Config`] is an immutable snapshot of every configured key. Subsystems
//! derive their own [`EffectiveConfig`] from it through
//! [`Config::values_with_prefix_override`], where keys under the subsystem's
//! namespace prefix win over ambient keys of the same name.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod keys;
pub mod loader;
mod store;
mod value;

/// Error type and result alias for configuration handling.
pub use error::{ConfigError, ConfigResult};
/// Well-known namespace prefixes.
pub use keys::{RESERVED_PREFIXES, SCHEMA_REGISTRY_PREFIX};
/// Configuration snapshots.
pub use store::{Config, EffectiveConfig};
/// Values stored in a configuration snapshot.
pub use value::ConfigValue;
