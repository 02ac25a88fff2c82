//! Certificate model, identity and expiry checks, and the TLS probe
//!
//! # Module Organization
//!
//! - `certificate` - Decoded certificate structures
//! - `hostname` - Hostname verification against commonName and alt-names
//! - `expiry` - Expiry window evaluation with an injectable clock
//! - `config` - Probe configuration
//! - `probe` - Fetching and decoding the peer certificate
//! - `verifier` - Chain-only certificate verifier
//!
//! # Example
//!
//! ```rust,ignore
//! use certpulse::tls::{CertificateSource, SystemClock, TlsProbe, is_expiring, verify_hostname};
//!
//! let cert = TlsProbe::default().fetch("example.com", 443).await?;
//! if verify_hostname(&cert, "example.com") && is_expiring(&cert, 30, &SystemClock)? {
//!     // renew
//! }
//! ```

pub mod certificate;
pub mod config;
pub mod expiry;
pub mod hostname;
pub mod probe;
pub mod verifier;

// Re-export commonly used types
pub use certificate::{AltName, AltNameKind, Attribute, Certificate, RdnGroup};
pub use config::TlsConfig;
pub use expiry::{Clock, SystemClock, expires_at, is_expiring, parse_not_after};
pub use hostname::{HostnameCheck, check_hostname, verify_hostname};
pub use probe::{CertificateSource, TlsProbe, ensure_crypto_provider};
pub use verifier::ChainVerifier;
