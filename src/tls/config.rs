use std::{path::PathBuf, time::Duration};

/// Default bound for TCP connect plus TLS handshake
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the endpoint certificate is fetched
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// PEM bundle of trusted roots; the Mozilla root program is used when unset
    pub ca: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            ca: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
