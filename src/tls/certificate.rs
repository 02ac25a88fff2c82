use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute name carrying the subject common name
pub const COMMON_NAME: &str = "commonName";

/// A single `(attribute, value)` pair inside an RDN group, e.g. `("commonName", "fake.com")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Relative distinguished name: one group of subject attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RdnGroup(Vec<Attribute>);

impl RdnGroup {
    #[must_use]
    pub const fn new(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }

    /// Group holding a single attribute, the common shape of subject entries
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![Attribute::new(name, value)])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }
}

/// Type tag of a subject alternative name entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AltNameKind {
    #[serde(rename = "DNS")]
    Dns,
    #[serde(rename = "IP Address")]
    IpAddress,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "URI")]
    Uri,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for AltNameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns => write!(f, "DNS"),
            Self::IpAddress => write!(f, "IP Address"),
            Self::Email => write!(f, "email"),
            Self::Uri => write!(f, "URI"),
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Subject alternative name entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltName {
    pub kind: AltNameKind,
    pub value: String,
}

impl AltName {
    #[must_use]
    pub fn dns(value: impl Into<String>) -> Self {
        Self {
            kind: AltNameKind::Dns,
            value: value.into(),
        }
    }
}

/// Decoded peer certificate as handed over by the TLS layer
///
/// `subject` and `subject_alt_names` are optional: a certificate may lack
/// either one and the checks treat a missing list the same as an empty one.
/// `not_after` keeps the textual form, e.g. `"Dec 31 00:00:00 2015 GMT"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<RdnGroup>>,
    #[serde(
        rename = "subjectAltName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subject_alt_names: Option<Vec<AltName>>,
    #[serde(rename = "notAfter")]
    pub not_after: String,
}

impl Certificate {
    /// All RDN groups of the subject, empty when the subject is absent
    pub fn subject(&self) -> impl Iterator<Item = &RdnGroup> {
        self.subject.iter().flatten()
    }

    /// All alt-names, empty when the extension is absent
    pub fn alt_names(&self) -> impl Iterator<Item = &AltName> {
        self.subject_alt_names.iter().flatten()
    }

    /// Every `commonName` value found in the subject
    pub fn common_names(&self) -> impl Iterator<Item = &str> {
        self.subject()
            .flat_map(RdnGroup::iter)
            .filter(|attr| attr.name == COMMON_NAME)
            .map(|attr| attr.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn sample() -> Certificate {
        Certificate {
            subject: Some(vec![
                RdnGroup::single("countryName", "US"),
                RdnGroup::single("organizationName", "FakeCompany"),
                RdnGroup::single(COMMON_NAME, "fake.com"),
            ]),
            subject_alt_names: Some(vec![AltName::dns("www.fake.com")]),
            not_after: "Dec 31 00:00:00 2015 GMT".to_string(),
        }
    }

    #[test]
    fn test_common_names() {
        let cert = sample();
        assert_eq!(cert.common_names().collect::<Vec<_>>(), vec!["fake.com"]);
    }

    #[test]
    fn test_absent_fields_iterate_empty() {
        let cert = Certificate {
            not_after: "Dec 31 00:00:00 2015 GMT".to_string(),
            ..Default::default()
        };
        assert_eq!(cert.subject().count(), 0);
        assert_eq!(cert.alt_names().count(), 0);
        assert_eq!(cert.common_names().count(), 0);
    }

    #[test]
    fn test_deserialize_peer_cert_shape() {
        let json = r#"{
            "notAfter": "Dec 31 00:00:00 2015 GMT",
            "subjectAltName": [{"kind": "DNS", "value": "www.fake.com"}],
            "subject": [
                [{"name": "countryName", "value": "US"}],
                [{"name": "commonName", "value": "fake.com"}]
            ]
        }"#;
        let cert: Certificate = serde_json::from_str(json).unwrap();
        assert_eq!(cert.common_names().collect::<Vec<_>>(), vec!["fake.com"]);
        assert_eq!(
            cert.alt_names().next(),
            Some(&AltName::dns("www.fake.com"))
        );
    }

    #[test]
    fn test_deserialize_without_alt_names() {
        let json = r#"{"notAfter": "Dec 31 00:00:00 2015 GMT"}"#;
        let cert: Certificate = serde_json::from_str(json).unwrap();
        assert!(cert.subject.is_none());
        assert!(cert.subject_alt_names.is_none());
    }

    #[test]
    fn test_unknown_alt_name_kind() {
        let json = r#"{"kind": "DirName", "value": "x"}"#;
        let alt: AltName = serde_json::from_str(json).unwrap();
        assert_eq!(alt.kind, AltNameKind::Other("DirName".to_string()));
        assert_eq!(alt.kind.to_string(), "DirName");
    }

    #[test]
    fn test_alt_name_kind_display() {
        assert_eq!(AltNameKind::Dns.to_string(), "DNS");
        assert_eq!(AltNameKind::IpAddress.to_string(), "IP Address");
    }
}
