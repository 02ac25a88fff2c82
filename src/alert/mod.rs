//! Expiry alert assembly and delivery

pub mod smtp;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

pub use smtp::{SmtpAlerter, SmtpConfig};

/// Human-readable layout of the expiry instant in alerts
pub const EXPIRY_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Notification delivery failures
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid mail address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("failed to send alert: {0}")]
    Transport(String),
}

/// Plain-text alert with its From / To / Subject headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    /// Header block, blank line, then the body
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AlertMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            self.from, self.to, self.subject, self.body
        )
    }
}

/// Build the "certificate about to expire" alert for `hostname`
#[must_use]
pub fn build_alert(
    expires: DateTime<Utc>,
    hostname: &str,
    recipient: &str,
    sender: &str,
) -> AlertMessage {
    let expiry = expires.format(EXPIRY_DISPLAY_FORMAT);

    AlertMessage {
        from: sender.to_string(),
        to: recipient.to_string(),
        subject: format!("SSL certificate for {hostname} due to expire {expiry}"),
        body: format!(
            "The SSL certificate for {hostname} is due to expire on {expiry}.  Please update and replace.\n"
        ),
    }
}

/// Delivers alert messages
#[async_trait]
pub trait Alerter: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`SendError`] if the message could not be delivered
    async fn send(
        &self,
        sender: &str,
        recipients: &[String],
        message: &AlertMessage,
    ) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 12, 31, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_build_alert_headers() {
        let message = build_alert(expiry(), "fake.com", "ops@fake.com", "certpulse@fake.com");
        assert_eq!(message.from, "certpulse@fake.com");
        assert_eq!(message.to, "ops@fake.com");
        assert_eq!(
            message.subject,
            "SSL certificate for fake.com due to expire 2015-12-31 00:00:00 UTC"
        );
    }

    #[test]
    fn test_build_alert_body() {
        let message = build_alert(expiry(), "fake.com", "ops@fake.com", "certpulse@fake.com");
        assert!(message.body.contains("fake.com"));
        assert!(message.body.contains("2015-12-31 00:00:00 UTC"));
        assert!(message.body.contains("Please update and replace."));
    }

    #[test]
    fn test_render() {
        let message = build_alert(expiry(), "fake.com", "ops@fake.com", "certpulse@fake.com");
        let text = message.render();
        assert!(text.starts_with("From: certpulse@fake.com\nTo: ops@fake.com\nSubject: "));
        assert!(text.contains("\n\nThe SSL certificate for fake.com"));
    }

    #[test]
    fn test_send_error_display() {
        let err = SendError::InvalidAddress {
            address: "nope".to_string(),
            reason: "missing domain".to_string(),
        };
        assert!(err.to_string().contains("\"nope\""));
        assert!(
            SendError::Transport("connection refused".to_string())
                .to_string()
                .contains("connection refused")
        );
    }
}
