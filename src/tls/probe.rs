use super::{
    Certificate, TlsConfig,
    certificate::{AltName, AltNameKind, Attribute, RdnGroup},
    expiry::format_not_after,
    verifier::ChainVerifier,
};
use crate::error::CheckError;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use rustls::{
    ClientConfig, RootCertStore,
    pki_types::{CertificateDer, ServerName},
};
use rustls_pemfile::certs;
use std::{
    io::Cursor,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    path::Path,
    sync::{Arc, OnceLock},
};
use tokio::{fs, net::TcpStream, time::timeout};
use tokio_rustls::{TlsConnector, client::TlsStream};
use tracing::debug;
use x509_parser::{
    extensions::GeneralName,
    prelude::{FromDer, X509Certificate},
    x509::X509Name,
};

static CRYPTO_PROVIDER_INIT: OnceLock<()> = OnceLock::new();

// dotted OID -> attribute name as reported for peer certificates
const ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    ("2.5.4.3", "commonName"),
    ("2.5.4.4", "surname"),
    ("2.5.4.5", "serialNumber"),
    ("2.5.4.6", "countryName"),
    ("2.5.4.7", "localityName"),
    ("2.5.4.8", "stateOrProvinceName"),
    ("2.5.4.9", "streetAddress"),
    ("2.5.4.10", "organizationName"),
    ("2.5.4.11", "organizationalUnitName"),
    ("2.5.4.15", "businessCategory"),
    ("2.5.4.17", "postalCode"),
    ("1.2.840.113549.1.9.1", "emailAddress"),
    ("0.9.2342.19200300.100.1.25", "domainComponent"),
];

/// Ensure the rustls crypto provider is initialized
///
/// This should be called before any TLS operations. It's safe to call
/// multiple times as initialization only happens once.
pub fn ensure_crypto_provider() {
    CRYPTO_PROVIDER_INIT.get_or_init(|| {
        if let Err(err) = rustls::crypto::ring::default_provider().install_default() {
            // another caller installed a provider first, use theirs
            debug!("rustls crypto provider already installed: {err:?}");
        }
    });
}

/// Yields the decoded certificate presented by `host:port`
#[async_trait]
pub trait CertificateSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CheckError::Connection`] if no trusted certificate could be obtained
    async fn fetch(&self, host: &str, port: u16) -> Result<Certificate, CheckError>;
}

/// Fetch certificates over a real TLS handshake
#[derive(Debug, Clone, Default)]
pub struct TlsProbe {
    config: TlsConfig,
}

impl TlsProbe {
    #[must_use]
    pub const fn new(config: TlsConfig) -> Self {
        Self { config }
    }

    async fn probe(&self, host: &str, port: u16) -> Result<Certificate> {
        let connector = build_tls_connector(&self.config)
            .await
            .context("failed to build TLS connector")?;
        let server_name = server_name_from_host(host)
            .with_context(|| format!("invalid server name: {host}"))?;

        let handshake = async {
            let stream = TcpStream::connect((host, port))
                .await
                .with_context(|| format!("failed to connect to {host}:{port}"))?;
            debug!("connected to {host}:{port}, starting TLS handshake");

            connector
                .connect(server_name, stream)
                .await
                .context("failed to complete TLS handshake")
        };

        let tls_stream = timeout(self.config.timeout, handshake)
            .await
            .map_err(|_| anyhow!("timed out after {:?}", self.config.timeout))??;

        certificate_from_tls_stream(&tls_stream)
    }
}

#[async_trait]
impl CertificateSource for TlsProbe {
    async fn fetch(&self, host: &str, port: u16) -> Result<Certificate, CheckError> {
        self.probe(host, port)
            .await
            .map_err(|err| CheckError::Connection {
                host: host.to_string(),
                port,
                reason: format!("{err:#}"),
            })
    }
}

async fn build_tls_connector(tls: &TlsConfig) -> Result<TlsConnector> {
    ensure_crypto_provider();

    let verifier = match &tls.ca {
        Some(path) => ChainVerifier::with_root_certificates(load_root_store(path).await?)?,
        None => ChainVerifier::new()?,
    };

    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

async fn load_root_store(path: &Path) -> Result<RootCertStore> {
    let data = fs::read(path)
        .await
        .with_context(|| format!("failed to read CA bundle {}", path.display()))?;
    let mut reader = Cursor::new(data);
    let parsed = certs(&mut reader)
        .collect::<std::result::Result<Vec<CertificateDer<'static>>, _>>()
        .map_err(|e| anyhow!("invalid certificate PEM: {e}"))?;

    if parsed.is_empty() {
        anyhow::bail!("no certificates found in {}", path.display());
    }

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(parsed);
    debug!(
        "loaded {added} CA certificates from {} ({ignored} ignored)",
        path.display()
    );

    if added == 0 {
        anyhow::bail!("no usable CA certificates in {}", path.display());
    }

    Ok(store)
}

fn server_name_from_host(host: &str) -> Result<ServerName<'static>> {
    host.parse::<IpAddr>().map_or_else(
        |_| {
            ServerName::try_from(host.to_string())
                .map_err(|_| anyhow!("invalid server name: {host}"))
        },
        |ip| Ok(ServerName::from(ip).to_owned()),
    )
}

fn certificate_from_tls_stream(stream: &TlsStream<TcpStream>) -> Result<Certificate> {
    let (_, connection) = stream.get_ref();
    let cert = connection
        .peer_certificates()
        .and_then(|certs| certs.first())
        .context("server presented no certificate")?;

    certificate_from_der(cert.as_ref())
}

/// Decode a DER leaf certificate into the [`Certificate`] model
///
/// # Errors
///
/// Returns an error if the DER cannot be parsed or the expiry is out of range
pub fn certificate_from_der(cert_der: &[u8]) -> Result<Certificate> {
    let (_, cert) = X509Certificate::from_der(cert_der)
        .map_err(|e| anyhow!("failed to parse certificate: {e}"))?;

    let subject = Some(subject_groups(cert.subject()));

    let subject_alt_names = cert
        .subject_alternative_name()
        .map_err(|e| anyhow!("invalid subjectAltName extension: {e}"))?
        .map(|ext| {
            ext.value
                .general_names
                .iter()
                .filter_map(alt_name)
                .collect()
        });

    let raw = cert.validity().not_after.to_datetime();
    let not_after = chrono::DateTime::<Utc>::from_timestamp(raw.unix_timestamp(), raw.nanosecond())
        .ok_or_else(|| anyhow!("invalid certificate expiry timestamp"))?;

    Ok(Certificate {
        subject,
        subject_alt_names,
        not_after: format_not_after(&not_after),
    })
}

fn attribute_name(oid: &str) -> String {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(dotted, _)| *dotted == oid)
        .map_or_else(|| oid.to_string(), |(_, name)| (*name).to_string())
}

fn subject_groups(name: &X509Name<'_>) -> Vec<RdnGroup> {
    name.iter()
        .map(|rdn| {
            RdnGroup::new(
                rdn.iter()
                    // non-string values (rare BMP/binary encodings) carry no hostname
                    .filter_map(|attr| {
                        let value = attr.as_str().ok()?;
                        Some(Attribute::new(
                            attribute_name(&attr.attr_type().to_id_string()),
                            value,
                        ))
                    })
                    .collect(),
            )
        })
        .collect()
}

fn alt_name(name: &GeneralName<'_>) -> Option<AltName> {
    let (kind, value) = match name {
        GeneralName::DNSName(dns) => (AltNameKind::Dns, (*dns).to_string()),
        GeneralName::RFC822Name(email) => (AltNameKind::Email, (*email).to_string()),
        GeneralName::URI(uri) => (AltNameKind::Uri, (*uri).to_string()),
        GeneralName::IPAddress(bytes) => (AltNameKind::IpAddress, ip_address(bytes)?),
        _ => return None,
    };

    Some(AltName { kind, value })
}

fn ip_address(bytes: &[u8]) -> Option<String> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Some(Ipv4Addr::from(octets).to_string());
    }
    <[u8; 16]>::try_from(bytes)
        .ok()
        .map(|octets| Ipv6Addr::from(octets).to_string())
}
