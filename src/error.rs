use crate::alert::SendError;
use thiserror::Error;

/// Failures that end a certificate check
#[derive(Debug, Error)]
pub enum CheckError {
    /// TCP connect, TLS handshake or chain validation failed
    #[error("failed to connect to {host}:{port}: {reason}")]
    Connection {
        host: String,
        port: u16,
        reason: String,
    },

    /// Neither the subject commonName nor any alt-name equals the target
    #[error("certificate did not match host name {hostname}")]
    HostnameMismatch { hostname: String },

    /// The certificate `notAfter` field could not be read as a timestamp
    #[error("malformed certificate expiry {not_after:?}: {reason}")]
    MalformedCertificate { not_after: String, reason: String },

    #[error(transparent)]
    Send(#[from] SendError),
}
