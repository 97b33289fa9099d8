//! Property-based testing for the key and record codecs using proptest

use proptest::prelude::*;
use skydns_provider::dns::key_codec::{build_key, extract_name, parse_key, reverse_domain, zone_path};
use skydns_provider::dns::record_codec::{decode_inferred, decode_typed, encode, DEFAULT_TTL};
use skydns_provider::dns::{Record, RecordType};
use std::time::Duration;

// Strategy for generating zone names
fn zone_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,20}[a-z0-9]?", 1..5).prop_map(|parts| parts.join("."))
}

// Strategy for record names relative to a zone
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9-]{0,30}"
}

// Strategy for host values that do not carry the reserved suffix
fn host_strategy() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d))
}

fn rtype_strategy() -> impl Strategy<Value = RecordType> {
    prop_oneof![
        Just(RecordType::A),
        Just(RecordType::Aaaa),
        Just(RecordType::Cname),
        Just(RecordType::Mx),
        Just(RecordType::Ns),
        Just(RecordType::Srv),
        Just(RecordType::Txt),
    ]
}

proptest! {
    #[test]
    fn test_trailing_dot_never_changes_keys(
        zone in zone_strategy(),
        name in name_strategy(),
        rtype in rtype_strategy()
    ) {
        let record = Record::new(rtype, name, "v", Duration::from_secs(60));
        let dotted = format!("{}.", zone);
        prop_assert_eq!(build_key("/skydns", &zone, &record), build_key("/skydns", &dotted, &record));
    }

    #[test]
    fn test_key_shape(
        zone in zone_strategy(),
        name in name_strategy(),
        rtype in rtype_strategy()
    ) {
        let record = Record::new(rtype, name.clone(), "v", Duration::from_secs(60));
        let key = build_key("/skydns", &zone, &record);
        let path = zone_path("/skydns", &zone);

        let expected_prefix = format!("/skydns/{}/", reverse_domain(&zone));
        let type_suffix = format!("/{}", rtype);
        prop_assert!(key.starts_with(&expected_prefix));
        prop_assert_eq!(key.ends_with(&type_suffix), rtype != RecordType::Txt);
        prop_assert_eq!(extract_name(&path, &key), Some(name.as_str()));

        let parsed = parse_key(&path, &key).unwrap();
        prop_assert_eq!(parsed.name, name);
        prop_assert_eq!(parsed.rtype, rtype);
    }

    #[test]
    fn test_apex_keys_yield_empty_name(
        zone in zone_strategy(),
        rtype in rtype_strategy()
    ) {
        let record = Record::new(rtype, "", "v", Duration::from_secs(60));
        let key = build_key("/skydns", &zone, &record);
        let path = format!("{}/", zone_path("/skydns", &zone));
        prop_assert_eq!(extract_name(&path, &key), Some(""));
    }

    #[test]
    fn test_reverse_twice_restores_labels(zone in zone_strategy()) {
        let reversed = reverse_domain(&zone).replace('/', ".");
        prop_assert_eq!(reverse_domain(&reversed).replace('/', "."), zone);
    }

    #[test]
    fn test_host_records_survive_round_trip(
        name in name_strategy(),
        host in host_strategy(),
        ttl in 0u64..=604_800
    ) {
        let record = Record::new(RecordType::A, name.clone(), host.clone(), Duration::from_secs(ttl));
        let raw = encode(&record).unwrap();

        let typed = decode_typed(RecordType::A, &name, raw.as_bytes()).unwrap().unwrap();
        prop_assert_eq!(&typed.value, &host);
        prop_assert_eq!(typed.ttl, DEFAULT_TTL);

        let inferred = decode_inferred(&name, raw.as_bytes(), ".dev").unwrap().unwrap();
        prop_assert_eq!(inferred.rtype, RecordType::A);
        prop_assert_eq!(inferred.name, name);
        prop_assert_eq!(inferred.value, host);
        prop_assert_eq!(inferred.ttl, DEFAULT_TTL);
    }

    #[test]
    fn test_reserved_suffix_always_infers_cname(
        name in name_strategy(),
        label in "[a-z][a-z0-9-]{0,20}"
    ) {
        let target = format!("{}.hubx.dev", label);
        let record = Record::new(RecordType::Cname, name.clone(), target.clone(), Duration::from_secs(60));
        let raw = encode(&record).unwrap();

        let decoded = decode_inferred(&name, raw.as_bytes(), ".dev").unwrap().unwrap();
        prop_assert_eq!(decoded.rtype, RecordType::Cname);
        prop_assert_eq!(decoded.value, target);
    }

    #[test]
    fn test_txt_round_trip(
        name in name_strategy(),
        text in "[\\x20-\\x7E]{1,255}"
    ) {
        let record = Record::new(RecordType::Txt, name.clone(), text.clone(), Duration::from_secs(60));
        let raw = encode(&record).unwrap();

        let decoded = decode_inferred(&name, raw.as_bytes(), ".dev").unwrap().unwrap();
        prop_assert_eq!(decoded.rtype, RecordType::Txt);
        prop_assert_eq!(decoded.value, text);
    }
}
