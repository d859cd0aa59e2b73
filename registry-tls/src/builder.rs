use registry_config::EffectiveConfig;

use crate::{TlsContext, TlsResult};

/// Two-phase builder producing a [`TlsContext`] from resolved configuration.
///
/// Callers invoke [`configure`](Self::configure) and then
/// [`build_context`](Self::build_context), once each, on the same thread.
pub trait TlsContextBuilder {
    /// Prepares the builder from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration cannot be turned into TLS
    /// settings.
    fn configure(&mut self, config: &EffectiveConfig) -> TlsResult<()>;

    /// Builds a fresh context from the most recent configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when key material cannot be loaded or the assembled
    /// settings are rejected.
    fn build_context(&self) -> TlsResult<TlsContext>;
}
