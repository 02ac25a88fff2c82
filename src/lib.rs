//! Check that a TLS endpoint presents a certificate matching its hostname and
//! that the certificate is not about to expire, sending an alert when it is.

pub mod alert;
pub mod check;
pub mod cli;
pub mod error;
pub mod tls;

pub use check::{CheckReport, CheckRequest, Outcome};
pub use error::CheckError;
