//! Canonical record shapes shared by every backend.

use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The record types this crate knows how to query and normalize.
///
/// The declaration order is the order the fan-out walks them in.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordType {
    A,
    AAAA,
    CAA,
    CNAME,
    NAPTR,
    MX,
    NS,
    PTR,
    SOA,
    SRV,
    TXT,
}

impl RecordType {
    /// Every supported type, in fan-out order.
    pub const ALL: [RecordType; 11] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::CAA,
        RecordType::CNAME,
        RecordType::NAPTR,
        RecordType::MX,
        RecordType::NS,
        RecordType::PTR,
        RecordType::SOA,
        RecordType::SRV,
        RecordType::TXT,
    ];

    /// The upper-case mnemonic.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CAA => "CAA",
            RecordType::CNAME => "CNAME",
            RecordType::NAPTR => "NAPTR",
            RecordType::MX => "MX",
            RecordType::NS => "NS",
            RecordType::PTR => "PTR",
            RecordType::SOA => "SOA",
            RecordType::SRV => "SRV",
            RecordType::TXT => "TXT",
        }
    }

    /// The numeric type code from the IANA registry.
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::CAA => 257,
        }
    }

    /// Case-insensitive lookup of a mnemonic.
    ///
    /// Returns `None` for anything outside the supported set.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value))
    }

    /// Exact (upper-case) lookup, as backends report types.
    fn from_mnemonic(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no supported record type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported record type: {0}")]
pub struct ParseRecordTypeError(pub String);

impl FromStr for RecordType {
    type Err = ParseRecordTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::parse(s).ok_or_else(|| ParseRecordTypeError(s.to_string()))
    }
}

/// The type carried by a normalized record.
///
/// Backends sometimes report types outside [`RecordType`] (DoH answers for
/// `DS`, `SIG`, or codes with no mnemonic at all, which become `UNKNOWN`).
/// Those land in `Other` and must be treated as a degraded match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Known(RecordType),
    Other(String),
}

impl RecordKind {
    /// Mnemonic used when a DoH type code has no known name.
    pub const UNKNOWN: &'static str = "UNKNOWN";

    /// Classify a backend-reported mnemonic.
    pub fn from_mnemonic(value: &str) -> Self {
        match RecordType::from_mnemonic(value) {
            Some(t) => RecordKind::Known(t),
            None => RecordKind::Other(value.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, RecordKind::Known(_))
    }

    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            RecordKind::Known(t) => Some(*t),
            RecordKind::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Known(t) => t.as_str(),
            RecordKind::Other(s) => s,
        }
    }
}

impl From<RecordType> for RecordKind {
    fn from(value: RecordType) -> Self {
        RecordKind::Known(value)
    }
}

impl PartialEq<RecordType> for RecordKind {
    fn eq(&self, other: &RecordType) -> bool {
        self.record_type() == Some(*other)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// MX payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxData {
    pub exchange: String,
    pub priority: u16,
}

/// SOA payload. `hostmaster` keeps the mailbox in domain form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoaData {
    pub nsname: String,
    pub hostmaster: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minttl: u32,
}

/// CAA payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaaData {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

/// NAPTR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NaptrData {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub service: String,
    pub regexp: String,
    pub replacement: String,
}

/// SRV payload. `name` is the target host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub name: String,
}

/// Record payload. Which variant appears is fixed by the record's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordData {
    Text(String),
    List(Vec<String>),
    Mx(MxData),
    Soa(SoaData),
    Caa(CaaData),
    Naptr(NaptrData),
    Srv(SrvData),
}

impl fmt::Display for RecordData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordData::Text(s) => f.write_str(s),
            RecordData::List(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "\"{part}\"")?;
                }
                Ok(())
            }
            RecordData::Mx(mx) => write!(f, "{} {}", mx.priority, mx.exchange),
            RecordData::Soa(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.nsname,
                soa.hostmaster,
                soa.serial,
                soa.refresh,
                soa.retry,
                soa.expire,
                soa.minttl
            ),
            RecordData::Caa(caa) => write!(f, "{} {} \"{}\"", caa.flags, caa.tag, caa.value),
            RecordData::Naptr(n) => write!(
                f,
                "{} {} \"{}\" \"{}\" \"{}\" {}",
                n.order, n.preference, n.flags, n.service, n.regexp, n.replacement
            ),
            RecordData::Srv(srv) => {
                write!(f, "{} {} {} {}", srv.priority, srv.weight, srv.port, srv.name)
            }
        }
    }
}

/// One normalized DNS answer.
///
/// Records are only built by the normalizer (or by backends that already
/// hold typed fields), so `name` never ends in a root dot and `data` always
/// has the shape its type calls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    #[serde(rename = "type")]
    kind: RecordKind,
    ttl: u32,
    data: RecordData,
}

impl Record {
    pub(crate) fn new(name: &str, kind: RecordKind, ttl: u32, data: RecordData) -> Self {
        Self {
            name: strip_root(name).to_string(),
            kind,
            ttl,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// The record type, or `None` for degraded (`Other`) records.
    pub fn record_type(&self) -> Option<RecordType> {
        self.kind.record_type()
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn data(&self) -> &RecordData {
        &self.data
    }

    pub fn into_data(self) -> RecordData {
        self.data
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            RecordData::Text(s) => Some(s),
            _ => None,
        }
    }

    /// TXT segments, whether they arrived split or as one string.
    pub fn texts(&self) -> Option<Vec<&str>> {
        match &self.data {
            RecordData::List(parts) => Some(parts.iter().map(String::as_str).collect()),
            RecordData::Text(s) if self.kind == RecordType::TXT => Some(vec![s.as_str()]),
            _ => None,
        }
    }

    pub fn mx(&self) -> Option<&MxData> {
        match &self.data {
            RecordData::Mx(mx) => Some(mx),
            _ => None,
        }
    }

    pub fn soa(&self) -> Option<&SoaData> {
        match &self.data {
            RecordData::Soa(soa) => Some(soa),
            _ => None,
        }
    }

    pub fn caa(&self) -> Option<&CaaData> {
        match &self.data {
            RecordData::Caa(caa) => Some(caa),
            _ => None,
        }
    }

    pub fn naptr(&self) -> Option<&NaptrData> {
        match &self.data {
            RecordData::Naptr(naptr) => Some(naptr),
            _ => None,
        }
    }

    pub fn srv(&self) -> Option<&SrvData> {
        match &self.data {
            RecordData::Srv(srv) => Some(srv),
            _ => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.name, self.ttl, self.kind, self.data)
    }
}

/// Removes a single trailing root-zone dot.
pub(crate) fn strip_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parse_is_case_insensitive() {
        assert_eq!(RecordType::parse("mx"), Some(RecordType::MX));
        assert_eq!(RecordType::parse("Aaaa"), Some(RecordType::AAAA));
        assert_eq!(RecordType::parse("TXT"), Some(RecordType::TXT));
        assert_eq!(RecordType::parse("bogus"), None);
        assert_eq!(RecordType::parse(""), None);
    }

    #[test]
    fn test_record_type_parse_does_not_trim() {
        assert_eq!(RecordType::parse(" mx "), None);
        assert_eq!(RecordType::parse("A\n"), None);
        assert!(" txt".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_record_type_from_str() {
        assert_eq!("naptr".parse::<RecordType>(), Ok(RecordType::NAPTR));
        assert_eq!(
            "DS".parse::<RecordType>(),
            Err(ParseRecordTypeError("DS".to_string()))
        );
    }

    #[test]
    fn test_all_is_ordered_and_unique() {
        let names: Vec<_> = RecordType::ALL.iter().map(RecordType::as_str).collect();
        assert_eq!(
            names,
            ["A", "AAAA", "CAA", "CNAME", "NAPTR", "MX", "NS", "PTR", "SOA", "SRV", "TXT"]
        );
        let codes: std::collections::HashSet<_> =
            RecordType::ALL.iter().map(RecordType::code).collect();
        assert_eq!(codes.len(), RecordType::ALL.len());
    }

    #[test]
    fn test_record_kind_classification() {
        assert_eq!(RecordKind::from_mnemonic("SOA"), RecordKind::Known(RecordType::SOA));
        assert_eq!(
            RecordKind::from_mnemonic("DNSKEY"),
            RecordKind::Other("DNSKEY".to_string())
        );
        // Backends report upper case; lower case is not silently upgraded
        assert!(!RecordKind::from_mnemonic("mx").is_known());
        assert_eq!(RecordKind::Known(RecordType::MX), RecordType::MX);
    }

    #[test]
    fn test_strip_root() {
        assert_eq!(strip_root("example.com."), "example.com");
        assert_eq!(strip_root("example.com"), "example.com");
        assert_eq!(strip_root("example.com.."), "example.com.");
        assert_eq!(strip_root("."), "");
    }

    #[test]
    fn test_record_serializes_to_flat_shape() {
        let record = Record::new(
            "example.com.",
            RecordType::MX.into(),
            300,
            RecordData::Mx(MxData {
                exchange: "mail.example.com".into(),
                priority: 10,
            }),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "example.com",
                "type": "MX",
                "ttl": 300,
                "data": { "exchange": "mail.example.com", "priority": 10 }
            })
        );
    }

    #[test]
    fn test_degraded_kind_serializes_as_mnemonic() {
        let record = Record::new(
            "example.com",
            RecordKind::Other(RecordKind::UNKNOWN.into()),
            0,
            RecordData::Text("\\# 0".into()),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "UNKNOWN");
        assert_eq!(record.record_type(), None);
    }

    #[test]
    fn test_data_display_presentation_form() {
        let txt = RecordData::List(vec!["v=spf1".into(), "-all".into()]);
        assert_eq!(txt.to_string(), "\"v=spf1\" \"-all\"");

        let srv = RecordData::Srv(SrvData {
            priority: 10,
            weight: 5,
            port: 5060,
            name: "sip.example.com".into(),
        });
        assert_eq!(srv.to_string(), "10 5 5060 sip.example.com");
    }
}
