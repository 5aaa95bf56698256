//! Client-side TLS assembly for HTTPS backends.
//!
//! Builds the rustls configuration (bundled webpki trust anchors, optional
//! extra root CAs, optional verification bypass) and wraps the TCP connector
//! so the handshake negotiates the wanted protocols via ALPN.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use hyper_util::client::legacy::connect::HttpConnector;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::config::schema::{ClientTlsConfig, TransportConfig};
use crate::transport::builder;
use crate::transport::error::TransportError;

/// TLS-capable connector used by the TCP clients.
pub type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

/// Connector restricted to HTTP/1.1 (ALPN never offers `h2`).
pub(crate) fn http1_connector(config: &TransportConfig) -> Result<HttpsConnector, TransportError> {
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(client_config(config.tls.as_ref())?)
        .https_or_http()
        .enable_http1()
        .wrap_connector(inner_connector(config)))
}

/// Connector offering `h2` and `http/1.1` via ALPN.
pub(crate) fn alpn_connector(config: &TransportConfig) -> Result<HttpsConnector, TransportError> {
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(client_config(config.tls.as_ref())?)
        .https_or_http()
        .enable_all_versions()
        .wrap_connector(inner_connector(config)))
}

fn inner_connector(config: &TransportConfig) -> HttpConnector {
    let mut connector = builder::http_connector(config);
    // The TLS wrapper handles https targets, so the inner connector must
    // accept them too.
    connector.enforce_http(false);
    connector
}

/// Assemble the rustls client config from the transport's TLS settings.
fn client_config(tls: Option<&ClientTlsConfig>) -> Result<ClientConfig, TransportError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(tls) = tls {
        for path in &tls.root_ca_paths {
            add_pem_roots(&mut roots, path)?;
        }
    }

    let mut config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    if tls.is_some_and(|tls| tls.insecure_skip_verify) {
        config
            .dangerous()
            .set_certificate_verifier(Arc::new(NoVerifier));
    }

    Ok(config)
}

/// Append every certificate in a PEM bundle to the root store.
fn add_pem_roots(roots: &mut RootCertStore, path: &str) -> Result<(), TransportError> {
    let file = File::open(path).map_err(|e| {
        TransportError::Configuration(format!("cannot read root CA bundle {path}: {e}"))
    })?;
    let mut reader = BufReader::new(file);
    for cert in rustls_pemfile::certs(&mut reader) {
        let cert = cert.map_err(|e| {
            TransportError::Configuration(format!("invalid PEM in root CA bundle {path}: {e}"))
        })?;
        roots.add(cert).map_err(|e| {
            TransportError::Configuration(format!("rejected root CA in {path}: {e}"))
        })?;
    }
    Ok(())
}

/// Accepts any backend certificate. Installed only when
/// `insecure_skip_verify` is set.
#[derive(Debug)]
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::ECDSA_SHA1_Legacy,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}
