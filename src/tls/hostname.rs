use super::Certificate;

/// Outcome of matching a certificate identity against a hostname
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostnameCheck {
    Valid,
    Invalid,
}

impl From<bool> for HostnameCheck {
    fn from(matched: bool) -> Self {
        if matched { Self::Valid } else { Self::Invalid }
    }
}

impl HostnameCheck {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Return true if the certificate was issued for `hostname`
///
/// The subject `commonName` attributes are scanned first, then every
/// alternative name regardless of its type tag. Comparison is exact: no
/// wildcard expansion, no case folding, no trailing dot or IDN handling.
/// A certificate without subject or without alt-names simply has nothing to
/// match in that field.
#[must_use]
pub fn verify_hostname(certificate: &Certificate, hostname: &str) -> bool {
    if certificate.common_names().any(|cn| cn == hostname) {
        return true;
    }

    certificate.alt_names().any(|alt| alt.value == hostname)
}

/// Typed form of [`verify_hostname`]
#[must_use]
pub fn check_hostname(certificate: &Certificate, hostname: &str) -> HostnameCheck {
    verify_hostname(certificate, hostname).into()
}
