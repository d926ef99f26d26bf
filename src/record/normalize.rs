//! Turns backend output into [`Record`]s.
//!
//! Every backend hands its raw `(name, type, ttl, data)` tuples to
//! [`normalize`], which owns the per-type payload parsing. Textual payloads
//! follow DNS presentation format as printed by `dig` and by DoH JSON
//! endpoints.

use super::types::{
    strip_root, CaaData, MxData, NaptrData, Record, RecordData, RecordKind, RecordType, SoaData,
    SrvData,
};
use crate::base::dnserror::DnsError;
use std::str::FromStr;

/// Raw payload as a backend reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawData {
    Text(String),
    List(Vec<String>),
}

impl RawData {
    /// The payload as one string, list parts joined by single spaces.
    pub fn joined(&self) -> String {
        match self {
            RawData::Text(s) => s.clone(),
            RawData::List(parts) => parts.join(" "),
        }
    }
}

impl From<String> for RawData {
    fn from(value: String) -> Self {
        RawData::Text(value)
    }
}

impl From<&str> for RawData {
    fn from(value: &str) -> Self {
        RawData::Text(value.to_string())
    }
}

impl From<Vec<String>> for RawData {
    fn from(value: Vec<String>) -> Self {
        RawData::List(value)
    }
}

/// Normalize one backend answer.
///
/// `rtype` is the backend-reported mnemonic. A missing `ttl` becomes 0.
///
/// # Errors
///
/// [`DnsError::Format`] when an SOA, MX, CAA, NAPTR or SRV payload is missing
/// fields or carries a non-numeric integer field.
pub fn normalize(
    name: &str,
    rtype: &str,
    ttl: Option<u32>,
    data: impl Into<RawData>,
) -> Result<Record, DnsError> {
    let kind = RecordKind::from_mnemonic(rtype);
    let data = convert_data(&kind, data.into())?;
    Ok(Record::new(name, kind, ttl.unwrap_or(0), data))
}

fn convert_data(kind: &RecordKind, data: RawData) -> Result<RecordData, DnsError> {
    let Some(rtype) = kind.record_type() else {
        return Ok(RecordData::Text(data.joined()));
    };

    match rtype {
        RecordType::SOA => parse_soa(&data.joined()).map(RecordData::Soa),
        RecordType::MX => parse_mx(&data.joined()).map(RecordData::Mx),
        RecordType::CAA => parse_caa(&data.joined()).map(RecordData::Caa),
        RecordType::NAPTR => parse_naptr(&data.joined()).map(RecordData::Naptr),
        RecordType::SRV => parse_srv(&data.joined()).map(RecordData::Srv),
        RecordType::TXT => {
            let txt = data.joined();
            // dig and some DoH providers print `"seg1" "seg2"`
            if txt.starts_with('"') && txt.ends_with('"') {
                Ok(RecordData::List(quoted_segments(&txt)))
            } else {
                Ok(RecordData::Text(txt))
            }
        }
        _ => Ok(RecordData::Text(data.joined())),
    }
}

fn parse_soa(raw: &str) -> Result<SoaData, DnsError> {
    let parts: Vec<&str> = raw.split(' ').collect();
    if parts.len() < 7 {
        return Err(DnsError::format(
            "SOA",
            format!("expected 7 fields, got {}", parts.len()),
        ));
    }

    Ok(SoaData {
        nsname: strip_root(parts[0]).to_string(),
        hostmaster: strip_root(parts[1]).to_string(),
        serial: int_field("SOA", "serial", parts[2])?,
        refresh: int_field("SOA", "refresh", parts[3])?,
        retry: int_field("SOA", "retry", parts[4])?,
        expire: int_field("SOA", "expire", parts[5])?,
        minttl: int_field("SOA", "minttl", parts[6])?,
    })
}

fn parse_mx(raw: &str) -> Result<MxData, DnsError> {
    let parts: Vec<&str> = raw.split(' ').collect();
    if parts.len() < 2 {
        return Err(DnsError::format(
            "MX",
            format!("expected priority and exchange, got {raw:?}"),
        ));
    }

    Ok(MxData {
        priority: int_field("MX", "priority", parts[0])?,
        exchange: strip_root(&parts[1..].join(" ")).to_string(),
    })
}

fn parse_caa(raw: &str) -> Result<CaaData, DnsError> {
    let tokens = tokenize(raw);

    if tokens.first().map(String::as_str) == Some("\\#") {
        return parse_generic_caa(&tokens);
    }

    if tokens.len() < 3 {
        return Err(DnsError::format(
            "CAA",
            format!("expected flags, tag and value, got {raw:?}"),
        ));
    }

    Ok(CaaData {
        flags: int_field("CAA", "flags", &tokens[0])?,
        tag: tokens[1].clone(),
        value: tokens[2..].join(" "),
    })
}

/// CAA in RFC 3597 generic form: `\# <len> <hex...>`, as some DoH
/// providers return it.
fn parse_generic_caa(tokens: &[String]) -> Result<CaaData, DnsError> {
    let hex: String = tokens.iter().skip(2).map(String::as_str).collect();
    let bytes = decode_hex(&hex)
        .ok_or_else(|| DnsError::format("CAA", format!("bad generic rdata {hex:?}")))?;

    let (flags, tag_len) = match bytes.as_slice() {
        [flags, tag_len, ..] => (*flags, *tag_len as usize),
        _ => return Err(DnsError::format("CAA", "generic rdata too short")),
    };
    let tag = bytes
        .get(2..2 + tag_len)
        .ok_or_else(|| DnsError::format("CAA", "generic rdata tag overruns payload"))?;

    Ok(CaaData {
        flags,
        tag: String::from_utf8_lossy(tag).into_owned(),
        value: String::from_utf8_lossy(&bytes[2 + tag_len..]).into_owned(),
    })
}

fn parse_naptr(raw: &str) -> Result<NaptrData, DnsError> {
    let tokens = tokenize(raw);
    if tokens.len() < 6 {
        return Err(DnsError::format(
            "NAPTR",
            format!("expected 6 fields, got {}", tokens.len()),
        ));
    }

    Ok(NaptrData {
        order: int_field("NAPTR", "order", &tokens[0])?,
        preference: int_field("NAPTR", "preference", &tokens[1])?,
        flags: tokens[2].clone(),
        service: tokens[3].clone(),
        regexp: tokens[4].clone(),
        replacement: strip_root(&tokens[5]).to_string(),
    })
}

fn parse_srv(raw: &str) -> Result<SrvData, DnsError> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(DnsError::format(
            "SRV",
            format!("expected 4 fields, got {}", parts.len()),
        ));
    }

    Ok(SrvData {
        priority: int_field("SRV", "priority", parts[0])?,
        weight: int_field("SRV", "weight", parts[1])?,
        port: int_field("SRV", "port", parts[2])?,
        name: strip_root(parts[3]).to_string(),
    })
}

fn int_field<T: FromStr>(rtype: &'static str, field: &str, value: &str) -> Result<T, DnsError> {
    value
        .parse()
        .map_err(|_| DnsError::format(rtype, format!("{field} is not an integer: {value:?}")))
}

/// Every `"..."` segment in order, quotes removed.
fn quoted_segments(txt: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = txt;

    while let Some(start) = rest.find('"') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('"') else { break };
        segments.push(after[..end].to_string());
        rest = &after[end + 1..];
    }

    segments
}

/// Whitespace-separated tokens; a double-quoted run is one token with its
/// quotes removed, and a backslash escapes the next character inside it.
fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if c == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    _ => token.push(c),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}
