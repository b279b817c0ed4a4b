//! TLS certificate validity probe.
//!
//! Connects to a host, captures the presented leaf certificate without
//! trusting it, and checks its validity window. Verification is disabled on
//! purpose: an expiry probe must still observe certificates that a strict
//! verifier would reject outright.

use crate::check::ports::{Probe, ProbeError, ProbeReport, ProbeResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::WebPkiSupportedAlgorithms;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::parse_x509_certificate;

/// Default number of days before expiry at which the probe reports
/// unhealthy.
pub const DEFAULT_WARN_WITHIN_DAYS: i64 = 14;

/// Certificate verifier that accepts every chain so the leaf can be
/// inspected after the handshake.
#[derive(Debug)]
struct CaptureOnlyVerifier(WebPkiSupportedAlgorithms);

impl ServerCertVerifier for CaptureOnlyVerifier {
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
        self.0.supported_schemes()
    }
}

/// Probe that reports the validity window of a host's TLS certificate.
#[derive(Debug, Clone)]
pub struct CertificateProbe {
    host: String,
    port: u16,
    warn_within_days: i64,
}

impl CertificateProbe {
    /// Creates a certificate probe for `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidTarget`] when the host is empty.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ProbeError> {
        let host_value = host.into();
        if host_value.trim().is_empty() {
            return Err(ProbeError::InvalidTarget(
                "certificate probe requires a host".to_owned(),
            ));
        }
        Ok(Self {
            host: host_value.trim().to_owned(),
            port,
            warn_within_days: DEFAULT_WARN_WITHIN_DAYS,
        })
    }

    /// Overrides the expiry warning horizon in days.
    #[must_use]
    pub const fn with_warn_within_days(mut self, days: i64) -> Self {
        self.warn_within_days = days;
        self
    }

    fn client_config() -> Result<ClientConfig, ProbeError> {
        let provider = rustls::crypto::ring::default_provider();
        let algorithms = provider.signature_verification_algorithms;
        let config = ClientConfig::builder_with_provider(Arc::new(provider))
            .with_safe_default_protocol_versions()
            .map_err(ProbeError::transport)?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(CaptureOnlyVerifier(algorithms)))
            .with_no_client_auth();
        Ok(config)
    }

    fn classify(&self, leaf: &CertificateDer<'_>, now: DateTime<Utc>) -> ProbeReport {
        let Ok((_, certificate)) = parse_x509_certificate(leaf.as_ref()) else {
            return ProbeReport::unhealthy(format!(
                "{} presented an unparseable certificate",
                self.host
            ));
        };

        let validity = certificate.validity();
        let not_before = DateTime::<Utc>::from_timestamp(validity.not_before.timestamp(), 0);
        let not_after = DateTime::<Utc>::from_timestamp(validity.not_after.timestamp(), 0);
        let (Some(not_before), Some(not_after)) = (not_before, not_after) else {
            return ProbeReport::unhealthy(format!(
                "{} certificate validity is out of range",
                self.host
            ));
        };

        let days_remaining = (not_after - now).num_days();
        let detail = json!({
            "host": self.host,
            "not_before": not_before.to_rfc3339(),
            "not_after": not_after.to_rfc3339(),
            "days_remaining": days_remaining,
        });

        let report = if now < not_before {
            ProbeReport::unhealthy(format!(
                "{} certificate is not valid before {not_before}",
                self.host
            ))
        } else if now > not_after {
            ProbeReport::unhealthy(format!("{} certificate expired {not_after}", self.host))
        } else if days_remaining < self.warn_within_days {
            ProbeReport::unhealthy(format!(
                "{} certificate expires in {days_remaining} days",
                self.host
            ))
        } else {
            ProbeReport::healthy(format!(
                "{} certificate valid for {days_remaining} more days",
                self.host
            ))
        };
        report.with_detail(detail)
    }
}

#[async_trait]
impl Probe for CertificateProbe {
    async fn probe(&self) -> ProbeResult<ProbeReport> {
        let config = Self::client_config()?;
        let connector = TlsConnector::from(Arc::new(config));
        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|_| ProbeError::InvalidTarget(format!("invalid host: {}", self.host)))?;

        let tcp = match TcpStream::connect((self.host.as_str(), self.port)).await {
            Ok(stream) => stream,
            Err(err) => {
                return Ok(ProbeReport::unhealthy(format!(
                    "cannot reach {}:{}: {err}",
                    self.host, self.port
                )));
            }
        };
        let stream = match connector.connect(server_name, tcp).await {
            Ok(stream) => stream,
            Err(err) => {
                return Ok(ProbeReport::unhealthy(format!(
                    "TLS handshake with {} failed: {err}",
                    self.host
                )));
            }
        };

        let (_, session) = stream.get_ref();
        let report = session.peer_certificates().and_then(<[_]>::first).map_or_else(
            || ProbeReport::unhealthy(format!("{} presented no certificate", self.host)),
            |leaf| self.classify(leaf, Utc::now()),
        );
        Ok(report)
    }
}
