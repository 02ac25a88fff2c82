use super::{AlertMessage, Alerter, SendError};
use async_trait::async_trait;
use lettre::{
    Address, Message, SmtpTransport, Transport,
    address::Envelope,
    message::{Mailbox, header::ContentType},
};
use std::time::Duration;
use tracing::debug;

/// Plain SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Alert channel delivering through an SMTP relay
#[derive(Debug, Clone, Default)]
pub struct SmtpAlerter {
    config: SmtpConfig,
}

impl SmtpAlerter {
    #[must_use]
    pub const fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Build the RFC 5322 message from the alert headers and body
    fn build_message(message: &AlertMessage) -> Result<Message, SendError> {
        Message::builder()
            .from(parse_mailbox(&message.from)?)
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| SendError::Message(e.to_string()))
    }

    fn envelope(sender: &str, recipients: &[String]) -> Result<Envelope, SendError> {
        let to = recipients
            .iter()
            .map(|recipient| parse_address(recipient))
            .collect::<Result<Vec<_>, _>>()?;

        Envelope::new(Some(parse_address(sender)?), to)
            .map_err(|e| SendError::Message(e.to_string()))
    }

    fn get_transport(&self) -> SmtpTransport {
        SmtpTransport::builder_dangerous(&self.config.host)
            .port(self.config.port)
            .timeout(Some(self.config.timeout))
            .build()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, SendError> {
    address.parse().map_err(|e: lettre::address::AddressError| {
        SendError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Parse a bare envelope address such as `ops@fake.com`
///
/// # Errors
///
/// Returns [`SendError::InvalidAddress`] if `address` is not a valid mailbox address
pub fn parse_address(address: &str) -> Result<Address, SendError> {
    address.parse().map_err(|e: lettre::address::AddressError| {
        SendError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl Alerter for SmtpAlerter {
    async fn send(
        &self,
        sender: &str,
        recipients: &[String],
        message: &AlertMessage,
    ) -> Result<(), SendError> {
        let email = Self::build_message(message)?;
        let envelope = Self::envelope(sender, recipients)?;
        let transport = self.get_transport();

        debug!(
            "sending alert to {recipients:?} via {}:{}",
            self.config.host, self.config.port
        );

        // SMTP transport is blocking, keep it off the runtime threads
        tokio::task::spawn_blocking(move || {
            transport
                .send_raw(&envelope, &email.formatted())
                .map_err(|e| SendError::Transport(e.to_string()))
        })
        .await
        .map_err(|e| SendError::Transport(e.to_string()))??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::alert::build_alert;
    use chrono::{TimeZone, Utc};

    fn message() -> AlertMessage {
        build_alert(
            Utc.with_ymd_and_hms(2015, 12, 31, 0, 0, 0).unwrap(),
            "fake.com",
            "ops@fake.com",
            "certpulse@fake.com",
        )
    }

    #[test]
    fn test_smtp_config_default() {
        let config = SmtpConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 25);
    }

    #[test]
    fn test_build_message() {
        let email = SmtpAlerter::build_message(&message()).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("From: certpulse@fake.com"));
        assert!(raw.contains("To: ops@fake.com"));
        assert!(raw.contains("Subject: SSL certificate for fake.com due to expire"));
        assert!(raw.contains("The SSL certificate for fake.com"));
    }

    #[test]
    fn test_build_message_invalid_from() {
        let mut bad = message();
        bad.from = "not an address".to_string();
        let err = SmtpAlerter::build_message(&bad).unwrap_err();
        assert!(matches!(err, SendError::InvalidAddress { .. }));
    }

    #[test]
    fn test_envelope() {
        let envelope =
            SmtpAlerter::envelope("certpulse@fake.com", &["ops@fake.com".to_string()]).unwrap();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("certpulse@fake.com")
        );
    }

    #[test]
    fn test_envelope_without_recipients() {
        let err = SmtpAlerter::envelope("certpulse@fake.com", &[]).unwrap_err();
        assert!(matches!(err, SendError::Message(_)));
    }

    #[test]
    fn test_envelope_invalid_recipient() {
        let err = SmtpAlerter::envelope("certpulse@fake.com", &["@@".to_string()]).unwrap_err();
        assert!(matches!(err, SendError::InvalidAddress { ref address, .. } if address == "@@"));
    }

    #[tokio::test]
    async fn test_send_to_closed_relay() {
        let alerter = SmtpAlerter::new(SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            timeout: Duration::from_secs(2),
        });
        let err = alerter
            .send("certpulse@fake.com", &["ops@fake.com".to_string()], &message())
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::Transport(_)));
    }
}
