#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use certpulse::{
    CheckError, CheckRequest,
    alert::{AlertMessage, Alerter, SendError},
    tls::{AltName, Certificate, CertificateSource, RdnGroup, certificate::COMMON_NAME},
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

pub const NOT_AFTER: &str = "Dec 31 00:00:00 2015 GMT";

/// Certificate shaped like a real peer certificate for `fake.com`
pub fn fake_certificate() -> Certificate {
    Certificate {
        subject: Some(vec![
            RdnGroup::single("countryName", "US"),
            RdnGroup::single("stateOrProvinceName", "Oregon"),
            RdnGroup::single("localityName", "Springfield"),
            RdnGroup::single("organizationName", "FakeCompany"),
            RdnGroup::single(COMMON_NAME, "fake.com"),
        ]),
        subject_alt_names: Some(vec![AltName::dns("www.fake.com")]),
        not_after: NOT_AFTER.to_string(),
    }
}

pub fn dec_1_2015() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 12, 1, 0, 0, 0).unwrap()
}

pub fn request(address: &str, warning_days: u32) -> CheckRequest {
    CheckRequest {
        address: address.to_string(),
        port: 443,
        recipient: "ops@fake.com".to_string(),
        sender: "certpulse@fake.com".to_string(),
        warning_days,
    }
}

/// Hands out a fixed certificate, or fails like an unreachable endpoint
pub struct FakeSource {
    certificate: Option<Certificate>,
    pub calls: Mutex<Vec<(String, u16)>>,
}

impl FakeSource {
    pub fn new(certificate: Certificate) -> Self {
        Self {
            certificate: Some(certificate),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            certificate: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CertificateSource for FakeSource {
    async fn fetch(&self, host: &str, port: u16) -> Result<Certificate, CheckError> {
        self.calls.lock().unwrap().push((host.to_string(), port));
        self.certificate
            .clone()
            .ok_or_else(|| CheckError::Connection {
                host: host.to_string(),
                port,
                reason: "connection refused".to_string(),
            })
    }
}

/// Records every alert instead of delivering it
#[derive(Default)]
pub struct RecordingAlerter {
    fail: bool,
    pub sent: Mutex<Vec<(String, Vec<String>, AlertMessage)>>,
}

impl RecordingAlerter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(String, Vec<String>, AlertMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Alerter for RecordingAlerter {
    async fn send(
        &self,
        sender: &str,
        recipients: &[String],
        message: &AlertMessage,
    ) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((sender.to_string(), recipients.to_vec(), message.clone()));

        if self.fail {
            return Err(SendError::Transport("relay unavailable".to_string()));
        }
        Ok(())
    }
}
