//! Normalizer tests against the public API.
//!
//! Covers every payload shape, name and TTL handling, and malformed input.

use digrs::record::{
    normalize, CaaData, MxData, NaptrData, RawData, RecordData, RecordKind, RecordType, SoaData,
    SrvData,
};

#[test]
fn test_root_dot_and_missing_ttl() {
    let record = normalize("example.com.", "A", None, "93.184.216.34").unwrap();
    assert_eq!(record.name(), "example.com");
    assert_eq!(record.ttl(), 0);
    assert_eq!(record.kind(), &RecordKind::Known(RecordType::A));
    assert_eq!(record.data(), &RecordData::Text("93.184.216.34".into()));
}

#[test]
fn test_txt_shapes() {
    let quoted = normalize("example.com", "TXT", Some(300), "\"a\" \"b\"").unwrap();
    assert_eq!(quoted.texts(), Some(vec!["a", "b"]));

    let bare = normalize("example.com", "TXT", Some(300), "hello").unwrap();
    assert_eq!(bare.data(), &RecordData::Text("hello".into()));
}

#[test]
fn test_list_payloads_are_joined() {
    let raw = RawData::List(vec!["v=spf1".into(), "-all".into()]);
    assert_eq!(raw.joined(), "v=spf1 -all");

    let record = normalize("example.com", "TXT", None, raw).unwrap();
    assert_eq!(record.text(), Some("v=spf1 -all"));
}

#[test]
fn test_soa() {
    let record = normalize(
        "example.com.",
        "SOA",
        Some(3600),
        "ns.icann.org. noc.dns.icann.org. 2024081400 7200 3600 1209600 3600",
    )
    .unwrap();

    assert_eq!(
        record.data(),
        &RecordData::Soa(SoaData {
            nsname: "ns.icann.org".into(),
            hostmaster: "noc.dns.icann.org".into(),
            serial: 2024081400,
            refresh: 7200,
            retry: 3600,
            expire: 1209600,
            minttl: 3600,
        })
    );
}

#[test]
fn test_short_soa_is_format_error() {
    let err = normalize(
        "example.com",
        "SOA",
        None,
        "ns.icann.org. noc.dns.icann.org. 1 2 3",
    )
    .unwrap_err();

    assert!(err.is_format());
    assert!(err.to_string().starts_with("Invalid SOA record format"));
}

#[test]
fn test_mx() {
    let record = normalize("example.com", "MX", Some(300), "10 mail.example.com.").unwrap();
    assert_eq!(
        record.mx(),
        Some(&MxData {
            exchange: "mail.example.com".into(),
            priority: 10,
        })
    );

    let err = normalize("example.com", "MX", None, "10").unwrap_err();
    assert!(err.is_format());

    let err = normalize("example.com", "MX", None, "high mail.example.com.").unwrap_err();
    assert!(err.is_format());
}

#[test]
fn test_caa() {
    let record = normalize("example.com", "CAA", None, "0 issue \"letsencrypt.org\"").unwrap();
    assert_eq!(
        record.caa(),
        Some(&CaaData {
            flags: 0,
            tag: "issue".into(),
            value: "letsencrypt.org".into(),
        })
    );

    let critical = normalize("example.com", "CAA", None, "128 iodef mailto:security@example.com")
        .unwrap();
    assert_eq!(critical.caa().unwrap().flags, 128);
    assert_eq!(critical.caa().unwrap().value, "mailto:security@example.com");

    assert!(normalize("example.com", "CAA", None, "0 issue").unwrap_err().is_format());
}

#[test]
fn test_naptr() {
    let record = normalize(
        "example.com",
        "NAPTR",
        Some(60),
        "100 10 \"U\" \"E2U+sip\" \"!^.*$!sip:info@example.com!\" .",
    )
    .unwrap();

    assert_eq!(
        record.naptr(),
        Some(&NaptrData {
            order: 100,
            preference: 10,
            flags: "U".into(),
            service: "E2U+sip".into(),
            regexp: "!^.*$!sip:info@example.com!".into(),
            replacement: "".into(),
        })
    );

    assert!(normalize("example.com", "NAPTR", None, "100 10 \"U\"")
        .unwrap_err()
        .is_format());
}

#[test]
fn test_srv() {
    let record = normalize(
        "_sip._tcp.example.com.",
        "SRV",
        Some(60),
        "0 5 5060 sipserver.example.com.",
    )
    .unwrap();

    assert_eq!(record.name(), "_sip._tcp.example.com");
    assert_eq!(
        record.srv(),
        Some(&SrvData {
            priority: 0,
            weight: 5,
            port: 5060,
            name: "sipserver.example.com".into(),
        })
    );

    assert!(normalize("example.com", "SRV", None, "0 5 99999 host.")
        .unwrap_err()
        .is_format());
}

#[test]
fn test_name_types_keep_data_verbatim() {
    for rtype in ["NS", "PTR", "CNAME", "AAAA"] {
        let record = normalize("example.com", rtype, Some(1), "target.example.net.").unwrap();
        assert_eq!(record.text(), Some("target.example.net."));
        assert_eq!(record.kind().as_str(), rtype);
    }
}

#[test]
fn test_unlisted_types_degrade_to_text() {
    let record = normalize("example.com", "DNSKEY", Some(1), "257 3 13 mdsswUyr3DPW").unwrap();
    assert!(!record.kind().is_known());
    assert_eq!(record.kind().as_str(), "DNSKEY");
    assert_eq!(record.text(), Some("257 3 13 mdsswUyr3DPW"));
}

#[test]
fn test_record_json_shape() {
    let record = normalize("example.com.", "MX", Some(300), "10 mail.example.com.").unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "example.com",
            "type": "MX",
            "ttl": 300,
            "data": {"exchange": "mail.example.com", "priority": 10}
        })
    );
}
