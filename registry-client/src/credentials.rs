//! Registry authentication resolved from client configuration.

use std::fmt;

use registry_config::EffectiveConfig;

use crate::{ClientError, ClientResult};

/// Configuration keys read when resolving credentials.
pub mod keys {
    /// Where basic auth credentials come from: `URL`, `USER_INFO` or `SASL_INHERIT`.
    pub const BASIC_AUTH_CREDENTIALS_SOURCE: &str = "basic.auth.credentials.source";
    /// `user:password` pair used with the `USER_INFO` source.
    pub const BASIC_AUTH_USER_INFO: &str = "basic.auth.user.info";
    /// JAAS login module configuration used with the `SASL_INHERIT` source.
    pub const SASL_JAAS_CONFIG: &str = "sasl.jaas.config";
    /// Where bearer tokens come from; only `STATIC_TOKEN` is supported.
    pub const BEARER_AUTH_CREDENTIALS_SOURCE: &str = "bearer.auth.credentials.source";
    /// Token used with the `STATIC_TOKEN` source.
    pub const BEARER_AUTH_TOKEN: &str = "bearer.auth.token";
}

/// Credentials presented to the registry.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP basic authentication.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// Static token.
        token: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

impl Credentials {
    /// Resolves credentials from configuration.
    ///
    /// `url_user_info` is the `user:password` section of the registry URL and
    /// is only consulted for the `URL` source, which is the default.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Credentials`] for unknown sources, missing or
    /// malformed inputs, or when basic and bearer auth are both requested.
    pub fn resolve(
        config: &EffectiveConfig,
        url_user_info: Option<&str>,
    ) -> ClientResult<Option<Self>> {
        let basic_source = config.get_str(keys::BASIC_AUTH_CREDENTIALS_SOURCE)?;

        if let Some(bearer_source) = config.get_str(keys::BEARER_AUTH_CREDENTIALS_SOURCE)? {
            if basic_source.is_some() {
                return Err(ClientError::credentials(
                    "basic and bearer authentication cannot both be configured",
                ));
            }
            return bearer(config, bearer_source).map(Some);
        }

        match basic_source.unwrap_or("URL") {
            "URL" => url_user_info.map(split_user_info).transpose(),
            "USER_INFO" => {
                let user_info = config
                    .get_str(keys::BASIC_AUTH_USER_INFO)?
                    .ok_or_else(|| {
                        ClientError::credentials("USER_INFO source requires basic.auth.user.info")
                    })?;
                split_user_info(user_info).map(Some)
            }
            "SASL_INHERIT" => {
                let jaas = config.get_str(keys::SASL_JAAS_CONFIG)?.ok_or_else(|| {
                    ClientError::credentials("SASL_INHERIT source requires sasl.jaas.config")
                })?;
                let username = jaas_option(jaas, "username").ok_or_else(|| {
                    ClientError::credentials("sasl.jaas.config does not define a username")
                })?;
                let password = jaas_option(jaas, "password").ok_or_else(|| {
                    ClientError::credentials("sasl.jaas.config does not define a password")
                })?;
                Ok(Some(Self::Basic { username, password }))
            }
            other => Err(ClientError::credentials(format!(
                "unknown basic auth credentials source `{other}`"
            ))),
        }
    }

    /// Returns a short label for logs.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}

fn bearer(config: &EffectiveConfig, source: &str) -> ClientResult<Credentials> {
    if source != "STATIC_TOKEN" {
        return Err(ClientError::credentials(format!(
            "unknown bearer auth credentials source `{source}`"
        )));
    }
    let token = config
        .get_str(keys::BEARER_AUTH_TOKEN)?
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ClientError::credentials("STATIC_TOKEN source requires bearer.auth.token"))?;
    Ok(Credentials::Bearer {
        token: token.to_owned(),
    })
}

fn split_user_info(user_info: &str) -> ClientResult<Credentials> {
    let (username, password) = user_info
        .split_once(':')
        .ok_or_else(|| ClientError::credentials("user info must have the form `user:password`"))?;
    if username.is_empty() {
        return Err(ClientError::credentials("user info has an empty user name"));
    }
    Ok(Credentials::Basic {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

// Extracts `name="value"` from a JAAS login module line.
fn jaas_option(jaas: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=\"");
    let mut search_from = 0;
    while let Some(offset) = jaas[search_from..].find(&needle) {
        let start = search_from + offset;
        let at_boundary = jaas[..start]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        let value_start = start + needle.len();
        if at_boundary {
            let end = jaas[value_start..].find('"')?;
            return Some(jaas[value_start..value_start + end].to_owned());
        }
        search_from = value_start;
    }
    None
}
