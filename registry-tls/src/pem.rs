//! PEM decoding into rustls key material.

use std::fs;
use std::path::Path;

use rustls::{Certificate, PrivateKey, RootCertStore};
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

use crate::{TlsError, TlsResult};

pub(crate) fn read(path: &Path) -> TlsResult<Vec<u8>> {
    fs::read(path).map_err(|source| TlsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn certificates(origin: &str, pem: &[u8]) -> TlsResult<Vec<Certificate>> {
    let certs = CertificateDer::pem_slice_iter(pem)
        .map(|cert| cert.map(|der| Certificate(der.as_ref().to_vec())))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Pem {
            origin: origin.to_owned(),
            source,
        })?;

    if certs.is_empty() {
        return Err(TlsError::configuration(format!(
            "no certificates found in {origin}"
        )));
    }
    Ok(certs)
}

pub(crate) fn private_key(origin: &str, pem: &[u8]) -> TlsResult<PrivateKey> {
    let key = PrivateKeyDer::from_pem_slice(pem).map_err(|source| TlsError::Pem {
        origin: origin.to_owned(),
        source,
    })?;
    Ok(PrivateKey(key.secret_der().to_vec()))
}

pub(crate) fn root_store(origin: &str, pem: &[u8]) -> TlsResult<RootCertStore> {
    let mut roots = RootCertStore::empty();
    for cert in certificates(origin, pem)? {
        roots
            .add(&cert)
            .map_err(|err| TlsError::InvalidCertificate {
                origin: origin.to_owned(),
                reason: err.to_string(),
            })?;
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    const CA_PEM: &[u8] = include_bytes!("../tests/fixtures/ca.pem");

    #[test]
    fn missing_key_keeps_parser_error_as_source() {
        let err = private_key("ssl.keystore.key", CA_PEM).expect_err("no key in CA bundle");

        assert!(matches!(err, TlsError::Pem { ref origin, .. } if origin == "ssl.keystore.key"));
        assert!(err.source().is_some());
    }

    #[test]
    fn reads_every_certificate_in_bundle() {
        let certs = certificates("ca.pem", CA_PEM).unwrap();
        assert_eq!(certs.len(), 1);
    }
}
