//! Server fixtures and a TLS line client.
//!
//! Helpers panic on failure; they are only meant for tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use super::bots::FakeBotRegistry;
#[cfg(test)]
use crate::adapter::inbound::server::{ResponseFormat, ServeContext, DEFAULT_MAX_LOGIN_ATTEMPTS};
use crate::adapter::inbound::server::{
    RemoteServer, ServerOptions, COMMAND_PROMPT, LOGIN_PROMPT, LOGIN_SUCCEEDED, PASSWORD_PROMPT,
};
#[cfg(test)]
use crate::application::Authenticator;
use crate::application::{hash_password, standard_registry, CommandRegistry};
use crate::domain::Credential;
use crate::infrastructure::tls::TlsIdentity;

/// How long the client waits for any single line.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Server config with a fresh self-signed `localhost` certificate.
pub fn tls_server_config() -> Arc<rustls::ServerConfig> {
    TlsIdentity::self_signed(&["localhost".to_string()])
        .and_then(TlsIdentity::into_server_config)
        .expect("self-signed TLS config")
}

/// Credential whose password hash matches `password`.
pub fn credential(login: &str, password: &str) -> Arc<Credential> {
    let hash = hash_password(password).expect("hash password");
    Arc::new(Credential::new(login, hash))
}

/// Standard commands over [`FakeBotRegistry::sample`].
pub fn sample_registry() -> Arc<CommandRegistry> {
    Arc::new(standard_registry(Arc::new(FakeBotRegistry::sample())))
}

/// Options for a loopback listener on a free port.
pub fn loopback_options() -> ServerOptions {
    ServerOptions::new("127.0.0.1:0", tls_server_config())
}

/// An unstarted server with the sample bots.
pub fn remote_server(login: &str, password: &str, options: ServerOptions) -> RemoteServer {
    RemoteServer::new(options, credential(login, password), sample_registry())
}

#[cfg(test)]
pub(crate) fn serve_context(login: &str, password: &str) -> ServeContext {
    ServeContext {
        authenticator: Authenticator::new(credential(login, password)),
        registry: sample_registry(),
        max_session_length: chrono::Duration::minutes(5),
        max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
        response_format: ResponseFormat::Json,
    }
}

/// Line-oriented TLS client speaking the remote-control protocol.
pub struct TestClient {
    lines: Lines<BufReader<ReadHalf<TlsStream<TcpStream>>>>,
    writer: WriteHalf<TlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect and complete the TLS handshake without verifying the server.
    pub async fn connect(addr: SocketAddr) -> std::io::Result<Self> {
        let config = rustls::ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(std::io::Error::other)?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(SkipServerVerification))
        .with_no_client_auth();

        let tcp = TcpStream::connect(addr).await?;
        let domain = ServerName::try_from("localhost").map_err(std::io::Error::other)?;
        let tls = TlsConnector::from(Arc::new(config))
            .connect(domain, tcp)
            .await?;
        let (reader, writer) = tokio::io::split(tls);
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
        })
    }

    /// Next line from the server; `None` once the connection is closed.
    pub async fn next_line(&mut self) -> Option<String> {
        tokio::time::timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap_or(None)
    }

    pub async fn expect(&mut self, expected: &str) {
        assert_eq!(self.next_line().await.as_deref(), Some(expected));
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("write line");
        self.writer.flush().await.expect("flush line");
    }

    /// Run the login handshake, ending after the first command prompt.
    pub async fn login(&mut self, login: &str, password: &str) {
        self.expect(LOGIN_PROMPT).await;
        self.send(login).await;
        self.expect(PASSWORD_PROMPT).await;
        self.send(password).await;
        self.expect(LOGIN_SUCCEEDED).await;
        self.expect(COMMAND_PROMPT).await;
    }

    /// Send a command and parse its JSON response, consuming the prompt.
    pub async fn command(&mut self, line: &str) -> serde_json::Value {
        self.send(line).await;
        let response = self.next_line().await.expect("response line");
        let value = serde_json::from_str(&response).expect("JSON response");
        self.expect(COMMAND_PROMPT).await;
        value
    }

    /// Close the write side so the server sees end of stream.
    pub async fn close(mut self) {
        let _ = self.writer.shutdown().await;
    }
}

#[derive(Debug)]
struct SkipServerVerification;

impl ServerCertVerifier for SkipServerVerification {
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
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
