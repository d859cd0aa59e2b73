//! rustls-backed [`TlsContextBuilder`] reading the `ssl.*` configuration keys.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use registry_config::EffectiveConfig;
use rustls::version::{TLS12, TLS13};
use rustls::{
    ALL_CIPHER_SUITES, Certificate, ClientConfig, PrivateKey, RootCertStore,
    SupportedCipherSuite, SupportedProtocolVersion,
};
use tracing::debug;

use crate::context::webpki_root_store;
use crate::{TlsContext, TlsContextBuilder, TlsError, TlsResult, pem};

/// Configuration keys understood by [`SslFactory`].
pub mod keys {
    /// Preferred protocol (`TLS`, `TLSv1.2` or `TLSv1.3`).
    pub const SSL_PROTOCOL: &str = "ssl.protocol";
    /// Explicit list of enabled protocols.
    pub const SSL_ENABLED_PROTOCOLS: &str = "ssl.enabled.protocols";
    /// Explicit list of cipher suite names.
    pub const SSL_CIPHER_SUITES: &str = "ssl.cipher.suites";
    /// Trust store format.
    pub const SSL_TRUSTSTORE_TYPE: &str = "ssl.truststore.type";
    /// Path to a PEM bundle of trusted certificates.
    pub const SSL_TRUSTSTORE_LOCATION: &str = "ssl.truststore.location";
    /// Inline PEM bundle of trusted certificates.
    pub const SSL_TRUSTSTORE_CERTIFICATES: &str = "ssl.truststore.certificates";
    /// Key store format.
    pub const SSL_KEYSTORE_TYPE: &str = "ssl.keystore.type";
    /// Path to a PEM file holding the client chain and private key.
    pub const SSL_KEYSTORE_LOCATION: &str = "ssl.keystore.location";
    /// Inline PEM client certificate chain.
    pub const SSL_KEYSTORE_CERTIFICATE_CHAIN: &str = "ssl.keystore.certificate.chain";
    /// Inline PEM private key.
    pub const SSL_KEYSTORE_KEY: &str = "ssl.keystore.key";
    /// Password protecting the private key.
    pub const SSL_KEY_PASSWORD: &str = "ssl.key.password";
    /// Server hostname verification algorithm.
    pub const SSL_ENDPOINT_IDENTIFICATION_ALGORITHM: &str =
        "ssl.endpoint.identification.algorithm";
}

const PEM_STORE_TYPE: &str = "PEM";
const DEFAULT_PROTOCOL: &str = "TLSv1.3";

#[derive(Clone, Debug, PartialEq, Eq)]
enum PemSource {
    File(PathBuf),
    Inline(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum KeystoreSource {
    File(PathBuf),
    Inline { chain: String, key: String },
}

/// TLS settings parsed from configuration, ready to be assembled.
#[derive(Clone, Debug)]
pub struct SslSettings {
    protocols: Vec<&'static SupportedProtocolVersion>,
    cipher_suites: Option<Vec<SupportedCipherSuite>>,
    truststore: Option<PemSource>,
    keystore: Option<KeystoreSource>,
}

impl SslSettings {
    /// Parses the `ssl.*` keys of a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError`] when protocols, cipher suites or store settings
    /// are unsupported or contradictory.
    pub fn from_config(config: &EffectiveConfig) -> TlsResult<Self> {
        check_store_type(config, keys::SSL_TRUSTSTORE_TYPE)?;
        check_store_type(config, keys::SSL_KEYSTORE_TYPE)?;

        if let Some(algorithm) = config.get_str(keys::SSL_ENDPOINT_IDENTIFICATION_ALGORITHM)? {
            if !algorithm.eq_ignore_ascii_case("https") {
                return Err(TlsError::configuration(format!(
                    "endpoint identification algorithm `{algorithm}` is not supported; \
                     hostname verification cannot be disabled"
                )));
            }
        }

        if config
            .get_str(keys::SSL_KEY_PASSWORD)?
            .is_some_and(|password| !password.is_empty())
        {
            return Err(TlsError::configuration(
                "encrypted private keys are not supported",
            ));
        }

        Ok(Self {
            protocols: protocols(config)?,
            cipher_suites: cipher_suites(config)?,
            truststore: truststore(config)?,
            keystore: keystore(config)?,
        })
    }

    /// Returns the enabled protocol versions, most preferred first.
    #[must_use]
    pub fn protocols(&self) -> &[&'static SupportedProtocolVersion] {
        &self.protocols
    }

    /// Returns the explicitly selected cipher suites, if any.
    #[must_use]
    pub fn cipher_suites(&self) -> Option<&[SupportedCipherSuite]> {
        self.cipher_suites.as_deref()
    }

    /// Returns `true` if a custom trust store replaces the default roots.
    #[must_use]
    pub fn has_truststore(&self) -> bool {
        self.truststore.is_some()
    }

    /// Returns `true` if a client identity is configured.
    #[must_use]
    pub fn has_keystore(&self) -> bool {
        self.keystore.is_some()
    }
}

fn check_store_type(config: &EffectiveConfig, key: &'static str) -> TlsResult<()> {
    match config.get_str(key)? {
        Some(store_type) if !store_type.eq_ignore_ascii_case(PEM_STORE_TYPE) => {
            Err(TlsError::UnsupportedStoreType {
                key,
                store_type: store_type.to_owned(),
            })
        }
        _ => Ok(()),
    }
}

fn protocols(config: &EffectiveConfig) -> TlsResult<Vec<&'static SupportedProtocolVersion>> {
    if let Some(enabled) = config.get_list(keys::SSL_ENABLED_PROTOCOLS)? {
        if enabled.is_empty() {
            return Err(TlsError::configuration(
                "ssl.enabled.protocols cannot be empty",
            ));
        }
        let mut versions: Vec<&'static SupportedProtocolVersion> =
            Vec::with_capacity(enabled.len());
        for name in &enabled {
            let version = match name.as_str() {
                "TLSv1.3" => &TLS13,
                "TLSv1.2" => &TLS12,
                other => {
                    return Err(TlsError::UnsupportedProtocol {
                        protocol: other.to_owned(),
                    });
                }
            };
            if !versions.iter().any(|known| std::ptr::eq(*known, version)) {
                versions.push(version);
            }
        }
        return Ok(versions);
    }

    let protocol = config
        .get_str(keys::SSL_PROTOCOL)?
        .unwrap_or(DEFAULT_PROTOCOL);
    match protocol {
        "TLS" | "TLSv1.3" => Ok(vec![&TLS13, &TLS12]),
        "TLSv1.2" => Ok(vec![&TLS12]),
        other => Err(TlsError::UnsupportedProtocol {
            protocol: other.to_owned(),
        }),
    }
}

fn cipher_suites(config: &EffectiveConfig) -> TlsResult<Option<Vec<SupportedCipherSuite>>> {
    let Some(names) = config.get_list(keys::SSL_CIPHER_SUITES)? else {
        return Ok(None);
    };
    if names.is_empty() {
        return Ok(None);
    }

    names
        .iter()
        .map(|name| {
            ALL_CIPHER_SUITES
                .iter()
                .copied()
                .find(|suite| suite_matches(*suite, name))
                .ok_or_else(|| TlsError::configuration(format!("unknown cipher suite `{name}`")))
        })
        .collect::<TlsResult<Vec<_>>>()
        .map(Some)
}

/// Matches rustls names (`TLS13_AES_128_GCM_SHA256`) and the IANA spelling
/// Kafka clients use for TLS 1.3 suites (`TLS_AES_128_GCM_SHA256`).
fn suite_matches(suite: SupportedCipherSuite, name: &str) -> bool {
    let rustls_name = format!("{:?}", suite.suite());
    if rustls_name == name {
        return true;
    }
    match (rustls_name.strip_prefix("TLS13_"), name.strip_prefix("TLS_")) {
        (Some(rustls_rest), Some(iana_rest)) => rustls_rest == iana_rest,
        _ => false,
    }
}

fn truststore(config: &EffectiveConfig) -> TlsResult<Option<PemSource>> {
    let location = config.get_str(keys::SSL_TRUSTSTORE_LOCATION)?;
    let inline = config.get_str(keys::SSL_TRUSTSTORE_CERTIFICATES)?;
    match (location, inline) {
        (Some(_), Some(_)) => Err(TlsError::configuration(
            "ssl.truststore.location and ssl.truststore.certificates are mutually exclusive",
        )),
        (Some(path), None) => Ok(Some(PemSource::File(PathBuf::from(path)))),
        (None, Some(pem)) => Ok(Some(PemSource::Inline(pem.to_owned()))),
        (None, None) => Ok(None),
    }
}

fn keystore(config: &EffectiveConfig) -> TlsResult<Option<KeystoreSource>> {
    let location = config.get_str(keys::SSL_KEYSTORE_LOCATION)?;
    let chain = config.get_str(keys::SSL_KEYSTORE_CERTIFICATE_CHAIN)?;
    let key = config.get_str(keys::SSL_KEYSTORE_KEY)?;
    match (location, chain, key) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(TlsError::configuration(
            "ssl.keystore.location cannot be combined with inline keystore entries",
        )),
        (Some(path), None, None) => Ok(Some(KeystoreSource::File(PathBuf::from(path)))),
        (None, Some(chain), Some(key)) => Ok(Some(KeystoreSource::Inline {
            chain: chain.to_owned(),
            key: key.to_owned(),
        })),
        (None, Some(_), None) | (None, None, Some(_)) => Err(TlsError::configuration(
            "ssl.keystore.certificate.chain and ssl.keystore.key must be set together",
        )),
        (None, None, None) => Ok(None),
    }
}

fn load_roots(source: &PemSource) -> TlsResult<RootCertStore> {
    match source {
        PemSource::File(path) => pem::root_store(&origin(path), &pem::read(path)?),
        PemSource::Inline(bundle) => {
            pem::root_store(keys::SSL_TRUSTSTORE_CERTIFICATES, bundle.as_bytes())
        }
    }
}

fn load_identity(source: &KeystoreSource) -> TlsResult<(Vec<Certificate>, PrivateKey)> {
    match source {
        KeystoreSource::File(path) => {
            let origin = origin(path);
            let contents = pem::read(path)?;
            Ok((
                pem::certificates(&origin, &contents)?,
                pem::private_key(&origin, &contents)?,
            ))
        }
        KeystoreSource::Inline { chain, key } => Ok((
            pem::certificates(keys::SSL_KEYSTORE_CERTIFICATE_CHAIN, chain.as_bytes())?,
            pem::private_key(keys::SSL_KEYSTORE_KEY, key.as_bytes())?,
        )),
    }
}

fn origin(path: &Path) -> String {
    path.display().to_string()
}

/// Client-mode TLS builder backed by rustls.
///
/// Only PEM key material is supported. Without a trust store the Mozilla root
/// set from `webpki-roots` is trusted.
#[derive(Debug, Default)]
pub struct SslFactory {
    settings: Option<SslSettings>,
}

impl SslFactory {
    /// Creates an unconfigured factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the settings captured by the last successful `configure`.
    #[must_use]
    pub fn settings(&self) -> Option<&SslSettings> {
        self.settings.as_ref()
    }
}

impl TlsContextBuilder for SslFactory {
    fn configure(&mut self, config: &EffectiveConfig) -> TlsResult<()> {
        self.settings = None;
        self.settings = Some(SslSettings::from_config(config)?);
        Ok(())
    }

    fn build_context(&self) -> TlsResult<TlsContext> {
        let settings = self.settings.as_ref().ok_or(TlsError::NotConfigured)?;

        let roots = match &settings.truststore {
            Some(source) => load_roots(source)?,
            None => webpki_root_store(),
        };

        let builder = ClientConfig::builder();
        let builder = match &settings.cipher_suites {
            Some(suites) => builder.with_cipher_suites(suites),
            None => builder.with_safe_default_cipher_suites(),
        };
        let builder = builder
            .with_safe_default_kx_groups()
            .with_protocol_versions(&settings.protocols)?
            .with_root_certificates(roots);

        let config = match &settings.keystore {
            Some(source) => {
                let (chain, key) = load_identity(source)?;
                builder.with_client_auth_cert(chain, key)?
            }
            None => builder.with_no_client_auth(),
        };

        debug!(
            protocols = settings.protocols.len(),
            custom_truststore = settings.truststore.is_some(),
            client_auth = settings.keystore.is_some(),
            "built TLS context"
        );
        Ok(TlsContext::new(Arc::new(config)))
    }
}
