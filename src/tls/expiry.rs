use super::Certificate;
use crate::error::CheckError;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Text layout of `notAfter`, e.g. `Dec 31 00:00:00 2015 GMT`
pub const NOT_AFTER_FORMAT: &str = "%b %e %H:%M:%S %Y GMT";

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Parse a `notAfter` value into a UTC instant
///
/// Day-of-month padding is not significant, so both `Jan  5` and `Jan 05` are
/// accepted. The trailing `GMT` zone is mandatory.
///
/// # Errors
///
/// Returns [`CheckError::MalformedCertificate`] if the text is not a valid timestamp
pub fn parse_not_after(not_after: &str) -> Result<DateTime<Utc>, CheckError> {
    let malformed = |reason: String| CheckError::MalformedCertificate {
        not_after: not_after.to_string(),
        reason,
    };

    let normalized = not_after.split_whitespace().collect::<Vec<_>>().join(" ");
    let without_zone = normalized
        .strip_suffix(" GMT")
        .ok_or_else(|| malformed("missing GMT zone".to_string()))?;

    NaiveDateTime::parse_from_str(without_zone, "%b %d %H:%M:%S %Y")
        .map(|naive| naive.and_utc())
        .map_err(|e| malformed(e.to_string()))
}

/// Render an instant the way certificates carry `notAfter`
#[must_use]
pub fn format_not_after(instant: &DateTime<Utc>) -> String {
    instant.format(NOT_AFTER_FORMAT).to_string()
}

/// Expiry instant of the certificate
///
/// # Errors
///
/// Returns [`CheckError::MalformedCertificate`] if `notAfter` cannot be parsed
pub fn expires_at(certificate: &Certificate) -> Result<DateTime<Utc>, CheckError> {
    parse_not_after(&certificate.not_after)
}

/// Return true if the certificate expires strictly before `now + warning_days`
///
/// A certificate expiring exactly at the deadline is not flagged. A window
/// reaching past the calendar range flags every certificate.
///
/// # Errors
///
/// Returns [`CheckError::MalformedCertificate`] if `notAfter` cannot be parsed
pub fn is_expiring(
    certificate: &Certificate,
    warning_days: u32,
    clock: &impl Clock,
) -> Result<bool, CheckError> {
    let expires = expires_at(certificate)?;

    let deadline = Duration::try_days(i64::from(warning_days))
        .and_then(|window| clock.now().checked_add_signed(window));

    Ok(deadline.is_none_or(|deadline| expires < deadline))
}
