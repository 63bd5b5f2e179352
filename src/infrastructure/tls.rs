//! TLS identity loading and server configuration.
//!
//! The server certificate comes either from PEM files or from a self-signed
//! certificate generated at startup. `rustls` always runs on the `ring`
//! provider, passed explicitly so no process-wide default is needed.

use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use tracing::info;

use super::config::server::TlsConfig;
use crate::error::{ConfigError, Result, TlsError};

/// Certificate chain and matching private key.
#[derive(Debug)]
pub struct TlsIdentity {
    pub certs: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

impl TlsIdentity {
    /// Read a PEM certificate chain and a PEM private key.
    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let pem_error = |path: &Path, err: rustls::pki_types::pem::Error| -> TlsError {
            match err {
                rustls::pki_types::pem::Error::Io(source) => TlsError::Read {
                    path: path.display().to_string(),
                    source,
                },
                other => TlsError::Pem {
                    path: path.display().to_string(),
                    reason: format!("{other:?}"),
                },
            }
        };

        let certs = CertificateDer::pem_file_iter(cert_path)
            .map_err(|err| pem_error(cert_path, err))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| pem_error(cert_path, err))?;
        if certs.is_empty() {
            return Err(TlsError::NoCertificates(cert_path.display().to_string()).into());
        }

        let key = PrivateKeyDer::from_pem_file(key_path).map_err(|err| pem_error(key_path, err))?;

        Ok(Self { certs, key })
    }

    /// Generate a throwaway certificate for `subjects`.
    pub fn self_signed(subjects: &[String]) -> Result<Self> {
        let certified = rcgen::generate_simple_self_signed(subjects.to_vec()).map_err(TlsError::from)?;
        let key = PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der());
        Ok(Self {
            certs: vec![certified.cert.der().clone()],
            key: PrivateKeyDer::Pkcs8(key),
        })
    }

    /// Resolve the identity described by the `[tls]` section.
    pub fn from_config(config: &TlsConfig) -> Result<Self> {
        if config.self_signed {
            info!(subjects = ?config.subject_names, "Using self-signed TLS certificate");
            return Self::self_signed(&config.subject_names);
        }

        let cert_path = config
            .cert_path
            .as_deref()
            .ok_or(ConfigError::MissingField { field: "cert_path" })?;
        let key_path = config
            .key_path
            .as_deref()
            .ok_or(ConfigError::MissingField { field: "key_path" })?;
        info!(cert = %cert_path.display(), "Loading TLS certificate");
        Self::from_pem_files(cert_path, key_path)
    }

    /// Build a rustls server configuration (TLS 1.2 and 1.3, no client auth).
    pub fn into_server_config(self) -> Result<Arc<rustls::ServerConfig>> {
        let config = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(TlsError::from)?
        .with_no_client_auth()
        .with_single_cert(self.certs, self.key)
        .map_err(TlsError::from)?;
        Ok(Arc::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn self_signed_identity_builds_server_config() {
        let identity = TlsIdentity::self_signed(&["localhost".to_string()]).unwrap();
        assert_eq!(identity.certs.len(), 1);
        assert!(identity.into_server_config().is_ok());
    }

    #[test]
    fn self_signed_keys_differ_between_calls() {
        let a = TlsIdentity::self_signed(&["localhost".to_string()]).unwrap();
        let b = TlsIdentity::self_signed(&["localhost".to_string()]).unwrap();
        assert_ne!(a.key.secret_der(), b.key.secret_der());
    }

    #[test]
    fn pem_files_round_trip_through_disk() {
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        std::fs::write(&cert_path, certified.cert.pem()).unwrap();
        std::fs::write(&key_path, certified.key_pair.serialize_pem()).unwrap();

        let identity = TlsIdentity::from_pem_files(&cert_path, &key_path).unwrap();
        assert_eq!(identity.certs.len(), 1);
        assert!(identity.into_server_config().is_ok());
    }

    #[test]
    fn missing_certificate_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TlsIdentity::from_pem_files(
            &dir.path().join("absent.pem"),
            &dir.path().join("absent-key.pem"),
        );
        assert!(matches!(result, Err(Error::Tls(TlsError::Read { .. }))));
    }

    #[test]
    fn empty_certificate_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cert_path = dir.path().join("cert.pem");
        std::fs::write(&cert_path, "").unwrap();
        let result = TlsIdentity::from_pem_files(&cert_path, &dir.path().join("key.pem"));
        assert!(matches!(
            result,
            Err(Error::Tls(TlsError::NoCertificates(_)))
        ));
    }
}
