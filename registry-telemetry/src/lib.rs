//! Tracing subscriber installation for binaries built on the registry crates.
//!
//! Libraries in this workspace only emit `tracing` events; a binary calls
//! [`init`] once at startup to route them to stderr.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable consulted for filter directives.
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already set for this process.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
    /// The filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {source}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Directive used when `RUST_LOG` is unset or empty.
    pub default_filter: String,
    /// Whether event targets are printed.
    pub with_target: bool,
    /// Whether ANSI colours are emitted.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_owned(),
            with_target: false,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Replaces the fallback filter directive.
    #[must_use]
    pub fn with_default_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }

    /// Toggles printing of event targets.
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    /// Toggles ANSI colours.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Builds the filter, preferring `env_directive` over the default.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] when the chosen directive
    /// does not parse.
    pub fn filter(&self, env_directive: Option<&str>) -> TelemetryResult<EnvFilter> {
        let directive = env_directive
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.default_filter);
        EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
            directive: directive.to_owned(),
            source,
        })
    }
}

/// Installs the global subscriber using `RUST_LOG` or the configured default.
///
/// # Errors
///
/// Returns [`TelemetryError::AlreadyInstalled`] when called twice and
/// [`TelemetryError::InvalidFilter`] for unparsable directives.
pub fn init(config: &TelemetryConfig) -> TelemetryResult<()> {
    let env_directive = std::env::var(LOG_ENV_VAR).ok();
    let filter = config.filter(env_directive.as_deref())?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(config.with_target)
                .with_ansi(config.ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .map_err(|_| TelemetryError::AlreadyInstalled)?;

    tracing::debug!(default_filter = %config.default_filter, "telemetry installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn env_directive_takes_precedence() {
        let config = TelemetryConfig::default().with_default_filter("warn");

        let filter = config.filter(Some("registry_factory=trace")).unwrap();

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn blank_env_directive_falls_back_to_default() {
        let config = TelemetryConfig::default().with_default_filter("debug");

        assert_eq!(
            config.filter(Some("  ")).unwrap().max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            config.filter(None).unwrap().max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn rejects_malformed_directive() {
        let config = TelemetryConfig::default().with_default_filter("registry=notalevel");

        let err = config.filter(None).expect_err("bad level");

        assert!(matches!(
            err,
            TelemetryError::InvalidFilter { ref directive, .. } if directive == "registry=notalevel"
        ));
    }

    #[test]
    fn second_installation_is_rejected() {
        let config = TelemetryConfig::default().with_ansi(false);

        let _ = init(&config);

        assert!(matches!(
            init(&config),
            Err(TelemetryError::AlreadyInstalled)
        ));
    }
}
