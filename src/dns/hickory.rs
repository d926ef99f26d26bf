//! Native resolver backed by hickory-dns.
//!
//! Queries the system's configured name servers (or an explicit list) with
//! hickory's async stub resolver and maps the typed answers straight into
//! [`Record`]s; only CAA goes back through the text normalizer.

use super::{Name, Resolve, Resolving};
use crate::base::dnserror::DnsError;
use crate::record::{
    normalize, strip_root, MxData, NaptrData, Record, RecordData, RecordType, SoaData, SrvData,
};
use hickory_resolver::{
    config::{NameServerConfigGroup, ResolverConfig},
    name_server::TokioConnectionProvider,
    proto::rr::{RData, Record as WireRecord, RecordType as WireType},
    TokioResolver,
};
use std::{
    fmt,
    net::IpAddr,
    sync::{Arc, LazyLock},
};

const DNS_PORT: u16 = 53;

/// Async resolver backed by hickory-dns.
///
/// Availability is decided at construction: a resolver made with
/// [`NativeResolver::unavailable`] fails every lookup with
/// [`DnsError::Environment`]. Lookup failures of an available resolver,
/// NXDOMAIN included, come back as an empty list.
///
/// # Example
///
/// ```rust,ignore
/// use digrs::dns::{NativeResolver, Name, Resolve};
/// use digrs::record::RecordType;
///
/// let resolver = NativeResolver::new();
/// let records = resolver.resolve(Name::new("example.com"), RecordType::MX).await?;
/// ```
#[derive(Clone)]
pub struct NativeResolver {
    resolver: Option<Arc<TokioResolver>>,
}

impl NativeResolver {
    /// Resolver using the system DNS configuration.
    ///
    /// The underlying hickory resolver is built once per process and shared.
    /// If the system configuration cannot be read, hickory's defaults are
    /// used instead.
    pub fn new() -> Self {
        static SYSTEM: LazyLock<Arc<TokioResolver>> = LazyLock::new(|| {
            let builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };
            Arc::new(builder.build())
        });

        Self {
            resolver: Some(SYSTEM.clone()),
        }
    }

    /// Resolver that only queries `servers` on port 53, over UDP with TCP
    /// fallback. An empty list means the system configuration.
    pub fn with_servers(servers: &[IpAddr]) -> Self {
        if servers.is_empty() {
            return Self::new();
        }
        let group = NameServerConfigGroup::from_ips_clear(servers, DNS_PORT, true);
        let config = ResolverConfig::from_parts(None, vec![], group);
        let resolver =
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default()).build();
        Self {
            resolver: Some(Arc::new(resolver)),
        }
    }

    /// Resolver for an environment without native DNS support.
    pub fn unavailable() -> Self {
        Self { resolver: None }
    }

    pub fn is_available(&self) -> bool {
        self.resolver.is_some()
    }
}

impl Default for NativeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NativeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeResolver")
            .field("available", &self.is_available())
            .finish()
    }
}

impl Resolve for NativeResolver {
    fn resolve(&self, name: Name, rtype: RecordType) -> Resolving {
        let resolver = self.resolver.clone();
        Box::pin(async move {
            let Some(resolver) = resolver else {
                return Err(DnsError::Environment);
            };

            let host = name.as_str();
            tracing::debug!(host = %host, rtype = %rtype, "resolving via hickory-dns");

            let lookup = match resolver.lookup(host, WireType::from(rtype.code())).await {
                Ok(lookup) => lookup,
                Err(e) => {
                    tracing::debug!(host = %host, rtype = %rtype, error = %e, "hickory-dns lookup failed");
                    return Ok(Vec::new());
                }
            };

            let records = records_from_answers(host, rtype, lookup.record_iter());
            tracing::debug!(host = %host, rtype = %rtype, count = records.len(), "hickory-dns lookup complete");
            Ok(records)
        })
    }
}

/// Shapes hickory answers into records named after the queried host.
///
/// Answers of another type (CNAME links in a chain) are dropped, as are
/// answers whose payload cannot be shaped; SOA yields at most one record.
fn records_from_answers<'a>(
    host: &str,
    rtype: RecordType,
    answers: impl IntoIterator<Item = &'a WireRecord>,
) -> Vec<Record> {
    let wanted = WireType::from(rtype.code());
    let mut records = Vec::new();

    for answer in answers {
        if answer.record_type() != wanted {
            continue;
        }
        let Some(data) = record_data(answer.data()) else {
            tracing::debug!(host = %host, rtype = %rtype, "skipping unshapeable answer");
            continue;
        };
        records.push(Record::new(host, rtype.into(), answer.ttl(), data));
        if rtype == RecordType::SOA {
            break;
        }
    }

    records
}

fn record_data(rdata: &RData) -> Option<RecordData> {
    let data = match rdata {
        RData::A(a) => RecordData::Text(a.to_string()),
        RData::AAAA(aaaa) => RecordData::Text(aaaa.to_string()),
        RData::NS(ns) => RecordData::Text(host_text(ns)),
        RData::PTR(ptr) => RecordData::Text(host_text(ptr)),
        RData::CNAME(cname) => RecordData::Text(host_text(cname)),
        RData::TXT(txt) => RecordData::Text(
            txt.txt_data()
                .iter()
                .map(|part| String::from_utf8_lossy(part).into_owned())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        RData::MX(mx) => RecordData::Mx(MxData {
            exchange: host_text(mx.exchange()),
            priority: mx.preference(),
        }),
        RData::SRV(srv) => RecordData::Srv(SrvData {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            name: host_text(srv.target()),
        }),
        RData::NAPTR(naptr) => RecordData::Naptr(NaptrData {
            order: naptr.order(),
            preference: naptr.preference(),
            flags: String::from_utf8_lossy(naptr.flags()).into_owned(),
            service: String::from_utf8_lossy(naptr.services()).into_owned(),
            regexp: String::from_utf8_lossy(naptr.regexp()).into_owned(),
            replacement: host_text(naptr.replacement()),
        }),
        RData::SOA(soa) => RecordData::Soa(SoaData {
            nsname: host_text(soa.mname()),
            hostmaster: host_text(soa.rname()),
            serial: soa.serial(),
            refresh: u32::try_from(soa.refresh()).unwrap_or_default(),
            retry: u32::try_from(soa.retry()).unwrap_or_default(),
            expire: u32::try_from(soa.expire()).unwrap_or_default(),
            minttl: soa.minimum(),
        }),
        RData::CAA(caa) => match normalize("", "CAA", None, caa.to_string()) {
            Ok(record) => record.into_data(),
            Err(e) => {
                tracing::debug!(error = %e, "unparseable CAA answer");
                return None;
            }
        },
        _ => return None,
    };
    Some(data)
}

fn host_text(name: &impl fmt::Display) -> String {
    strip_root(&name.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::rr::{
        rdata::{A, AAAA, CNAME, MX, NS, SOA, SRV, TXT},
        Name as WireName,
    };
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn wire_name(name: &str) -> WireName {
        WireName::from_ascii(name).unwrap()
    }

    fn answer(ttl: u32, rdata: RData) -> WireRecord {
        WireRecord::from_rdata(wire_name("example.com."), ttl, rdata)
    }

    #[tokio::test]
    async fn test_unavailable_is_environment_error() {
        let resolver = NativeResolver::unavailable();
        assert!(!resolver.is_available());
        let err = resolver
            .resolve(Name::new("example.com"), RecordType::A)
            .await
            .unwrap_err();
        assert!(matches!(err, DnsError::Environment));
    }

    #[test]
    fn test_with_servers_is_available() {
        let resolver = NativeResolver::with_servers(&[IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))]);
        assert!(resolver.is_available());
    }

    #[test]
    fn test_empty_server_list_uses_system_config() {
        let empty = NativeResolver::with_servers(&[]);
        let system = NativeResolver::new();
        assert!(Arc::ptr_eq(
            empty.resolver.as_ref().unwrap(),
            system.resolver.as_ref().unwrap()
        ));
    }

    #[test]
    fn test_addresses_carry_ttl() {
        let answers = [
            answer(300, RData::A(A(Ipv4Addr::new(93, 184, 216, 34)))),
            answer(120, RData::A(A(Ipv4Addr::new(93, 184, 216, 35)))),
        ];
        let records = records_from_answers("example.com", RecordType::A, &answers);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text(), Some("93.184.216.34"));
        assert_eq!(records[0].ttl(), 300);
        assert_eq!(records[1].ttl(), 120);
        assert_eq!(records[1].record_type(), Some(RecordType::A));
    }

    #[test]
    fn test_ipv6_address() {
        let answers = [answer(60, RData::AAAA(AAAA(Ipv6Addr::LOCALHOST)))];
        let records = records_from_answers("example.com", RecordType::AAAA, &answers);
        assert_eq!(records[0].text(), Some("::1"));
    }

    #[test]
    fn test_cname_links_are_dropped() {
        let answers = [
            WireRecord::from_rdata(
                wire_name("www.example.com."),
                300,
                RData::CNAME(CNAME(wire_name("example.com."))),
            ),
            answer(300, RData::A(A(Ipv4Addr::new(93, 184, 216, 34)))),
        ];
        let records = records_from_answers("www.example.com", RecordType::A, &answers);
        assert_eq!(records.len(), 1);
        // Named after the query, not the chain target
        assert_eq!(records[0].name(), "www.example.com");
    }

    #[test]
    fn test_mx_and_srv_from_typed_fields() {
        let mx = [answer(
            3600,
            RData::MX(MX::new(10, wire_name("mail.example.com."))),
        )];
        let records = records_from_answers("example.com", RecordType::MX, &mx);
        assert_eq!(
            records[0].mx(),
            Some(&MxData {
                exchange: "mail.example.com".into(),
                priority: 10,
            })
        );

        let srv = [answer(
            60,
            RData::SRV(SRV::new(0, 5, 5060, wire_name("sip.example.com."))),
        )];
        let records = records_from_answers("example.com", RecordType::SRV, &srv);
        assert_eq!(
            records[0].srv(),
            Some(&SrvData {
                priority: 0,
                weight: 5,
                port: 5060,
                name: "sip.example.com".into(),
            })
        );
    }

    #[test]
    fn test_soa_yields_single_record() {
        let soa = SOA::new(
            wire_name("ns.icann.org."),
            wire_name("noc.dns.icann.org."),
            2024081400,
            7200,
            3600,
            1209600,
            3600,
        );
        let answers = [
            answer(3600, RData::SOA(soa.clone())),
            answer(3600, RData::SOA(soa)),
        ];
        let records = records_from_answers("example.com", RecordType::SOA, &answers);
        assert_eq!(records.len(), 1);
        let soa = records[0].soa().unwrap();
        assert_eq!(soa.nsname, "ns.icann.org");
        assert_eq!(soa.hostmaster, "noc.dns.icann.org");
        assert_eq!(soa.serial, 2024081400);
        assert_eq!(soa.expire, 1209600);
        assert_eq!(soa.minttl, 3600);
    }

    #[test]
    fn test_txt_segments_joined() {
        let answers = [answer(
            300,
            RData::TXT(TXT::new(vec!["v=spf1".to_string(), "-all".to_string()])),
        )];
        let records = records_from_answers("example.com", RecordType::TXT, &answers);
        assert_eq!(records[0].text(), Some("v=spf1 -all"));
    }

    #[test]
    fn test_name_targets_lose_root_dot() {
        let answers = [answer(
            172800,
            RData::NS(NS(wire_name("a.iana-servers.net."))),
        )];
        let records = records_from_answers("example.com.", RecordType::NS, &answers);
        assert_eq!(records[0].name(), "example.com");
        assert_eq!(records[0].text(), Some("a.iana-servers.net"));
    }
}
