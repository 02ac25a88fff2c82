use crate::{
    alert::{Alerter, SendError, build_alert},
    error::CheckError,
    tls::{CertificateSource, Clock, HostnameCheck, check_hostname, expires_at, is_expiring},
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

/// One endpoint to check and who to tell about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub address: String,
    pub port: u16,
    pub recipient: String,
    pub sender: String,
    pub warning_days: u32,
}

/// Terminal state of a successful check
#[derive(Debug)]
pub enum Outcome {
    /// Hostname matches and expiry is outside the warning window
    Healthy { expires: DateTime<Utc> },
    /// Certificate is expiring and the alert was delivered
    Notified { expires: DateTime<Utc> },
    /// Certificate is expiring but the alert could not be delivered
    NotificationFailed {
        expires: DateTime<Utc>,
        error: SendError,
    },
}

impl Outcome {
    #[must_use]
    pub const fn expires(&self) -> DateTime<Utc> {
        match self {
            Self::Healthy { expires }
            | Self::Notified { expires }
            | Self::NotificationFailed { expires, .. } => *expires,
        }
    }

    /// True when the certificate fell inside the warning window
    #[must_use]
    pub const fn is_expiring(&self) -> bool {
        !matches!(self, Self::Healthy { .. })
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy { .. } => "healthy",
            Self::Notified { .. } => "notified",
            Self::NotificationFailed { .. } => "notification_failed",
        }
    }
}

/// Summary of a check, printed with `--json`
#[derive(Serialize, Debug)]
pub struct CheckReport {
    pub time: String,
    pub address: String,
    pub port: u16,
    pub outcome: &'static str,
    pub expires: String,
    pub warning_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckReport {
    #[must_use]
    pub fn new(request: &CheckRequest, outcome: &Outcome, now: DateTime<Utc>) -> Self {
        let error = match outcome {
            Outcome::NotificationFailed { error, .. } => Some(error.to_string()),
            _ => None,
        };

        Self {
            time: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            address: request.address.clone(),
            port: request.port,
            outcome: outcome.as_str(),
            expires: outcome.expires().to_rfc3339_opts(SecondsFormat::Secs, true),
            warning_days: request.warning_days,
            error,
        }
    }
}

/// Run a single check: fetch, verify hostname, evaluate expiry, alert
///
/// # Errors
///
/// Returns [`CheckError::Connection`] if the certificate cannot be obtained,
/// [`CheckError::HostnameMismatch`] if it was not issued for the address and
/// [`CheckError::MalformedCertificate`] if its expiry cannot be read.
/// A failed alert delivery is not an error, see [`Outcome::NotificationFailed`].
pub async fn run<S, A, C>(
    source: &S,
    alerter: &A,
    clock: &C,
    request: &CheckRequest,
) -> Result<Outcome, CheckError>
where
    S: CertificateSource + ?Sized,
    A: Alerter + ?Sized,
    C: Clock,
{
    let address = request.address.as_str();

    let certificate = source.fetch(address, request.port).await?;
    debug!("fetched certificate for {address}:{}", request.port);

    if check_hostname(&certificate, address) == HostnameCheck::Invalid {
        error!("Certificate did not match host name {address}");
        return Err(CheckError::HostnameMismatch {
            hostname: address.to_string(),
        });
    }
    debug!("Certificate for {address} is valid");

    let expires = expires_at(&certificate)?;
    if !is_expiring(&certificate, request.warning_days, clock)? {
        info!("Certificate for {address} is valid and isn't expiring (expires {expires})");
        return Ok(Outcome::Healthy { expires });
    }
    info!(
        "Certificate for {address} is going to expire on {expires}, within {} days",
        request.warning_days
    );

    let message = build_alert(expires, address, &request.recipient, &request.sender);
    let recipients = [request.recipient.clone()];

    match alerter.send(&request.sender, &recipients, &message).await {
        Ok(()) => {
            info!("Alert for {address} sent to {}", request.recipient);
            Ok(Outcome::Notified { expires })
        }
        Err(err) => {
            error!("Failed to send alert for {address}: {err}");
            Ok(Outcome::NotificationFailed {
                expires,
                error: err,
            })
        }
    }
}
