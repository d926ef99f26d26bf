//! Resolver for DNS-over-HTTPS JSON endpoints.
//!
//! Speaks the `application/dns-json` flavour served by Google
//! (`https://dns.google/resolve`) and Cloudflare
//! (`https://cloudflare-dns.com/dns-query`): a GET with `name` and `type`
//! query parameters, answered by a JSON document whose `Answer` array
//! carries numeric type codes.

use super::{Name, Resolve, Resolving};
use crate::base::dnserror::DnsError;
use crate::http::{HttpTransport, HyperTransport};
use crate::record::{normalize, Record, RecordKind, RecordType};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use url::Url;

/// Media type requested from DoH JSON endpoints.
pub const DNS_JSON: &str = "application/dns-json";

/// Google Public DNS JSON API.
pub const GOOGLE_ENDPOINT: &str = "https://dns.google/resolve";

/// Cloudflare DNS JSON API.
pub const CLOUDFLARE_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Resolver for a DoH JSON endpoint.
///
/// The endpoint is parsed on every lookup, so a malformed endpoint surfaces
/// as [`DnsError::InvalidUrl`] from `resolve` rather than at construction.
#[derive(Clone)]
pub struct DohResolver {
    endpoint: Arc<str>,
    transport: Arc<dyn HttpTransport>,
}

impl DohResolver {
    /// Resolver for `endpoint` over the default [`HyperTransport`].
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_transport(endpoint, Arc::new(HyperTransport::new()))
    }

    /// Resolver for `endpoint` over a caller-supplied transport.
    pub fn with_transport(endpoint: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint: endpoint.into().into(),
            transport,
        }
    }

    /// Google Public DNS.
    pub fn google() -> Self {
        Self::new(GOOGLE_ENDPOINT)
    }

    /// Cloudflare DNS.
    pub fn cloudflare() -> Self {
        Self::new(CLOUDFLARE_ENDPOINT)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The endpoint with `name` and `type` set, replacing any existing
    /// values for those keys.
    pub fn query_url(&self, host: &str, rtype: RecordType) -> Result<Url, DnsError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|e| DnsError::InvalidUrl(format!("{e}: {}", self.endpoint)))?;

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "name" && k != "type")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.extend_pairs(kept);
            pairs.append_pair("name", host);
            pairs.append_pair("type", rtype.as_str());
        }

        Ok(url)
    }
}

impl fmt::Debug for DohResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DohResolver")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Resolve for DohResolver {
    fn resolve(&self, name: Name, rtype: RecordType) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let host = name.as_str();
            let url = resolver.query_url(host, rtype)?;
            tracing::debug!(host = %host, rtype = %rtype, endpoint = %resolver.endpoint, "resolving via DoH");

            let reply = resolver.transport.get(url, DNS_JSON).await?;
            if !reply.status().is_success() {
                tracing::debug!(host = %host, status = %reply.status(), "DoH endpoint refused lookup");
                return Err(DnsError::transport(host, reply.status()));
            }

            let response: DnsJsonResponse = reply.json()?;
            let records = parse_answers(response)?;
            tracing::debug!(host = %host, rtype = %rtype, count = records.len(), "DoH lookup complete");
            Ok(records)
        })
    }
}

/// Wire shape of a DoH JSON answer; only the fields we read.
#[derive(Debug, Deserialize)]
struct DnsJsonResponse {
    #[serde(rename = "Answer", default)]
    answer: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct DnsJsonAnswer {
    name: String,
    #[serde(rename = "type")]
    rtype: u16,
    #[serde(rename = "TTL", default)]
    ttl: Option<u32>,
    data: String,
}

/// A missing or non-array `Answer` means no records.
fn parse_answers(response: DnsJsonResponse) -> Result<Vec<Record>, DnsError> {
    let serde_json::Value::Array(entries) = response.answer else {
        return Ok(Vec::new());
    };

    entries
        .into_iter()
        .map(|entry| {
            let answer: DnsJsonAnswer =
                serde_json::from_value(entry).map_err(|e| DnsError::InvalidJson(e.to_string()))?;
            normalize(
                &answer.name,
                type_mnemonic(answer.rtype),
                answer.ttl,
                answer.data,
            )
        })
        .collect()
}

/// Maps a DoH numeric type code to its mnemonic.
///
/// Codes outside the table map to [`RecordKind::UNKNOWN`].
pub fn type_mnemonic(code: u16) -> &'static str {
    match code {
        1 => "A",
        2 => "NS",
        5 => "CNAME",
        6 => "SOA",
        12 => "PTR",
        15 => "MX",
        16 => "TXT",
        24 => "SIG",
        25 => "KEY",
        28 => "AAAA",
        33 => "SRV",
        35 => "NAPTR",
        43 => "DS",
        48 => "DNSKEY",
        257 => "CAA",
        _ => RecordKind::UNKNOWN,
    }
}
