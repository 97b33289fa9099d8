//! Conversion between records and stored SkyDNS documents
//!
//! A stored value is a small JSON object:
//!
//! ```text
//! { "host": "10.0.0.1", "ttl": 300 }        A, CNAME and other host records
//! { "text": "v=spf1 -all", "ttl": 300 }     TXT records
//! ```
//!
//! Reading a value back never trusts the stored `ttl`: every decoded record
//! carries `DEFAULT_TTL`. When the type is not known from the key, it is
//! inferred from the payload with `INFERENCE_RULES`.

use std::convert::TryFrom;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dns::record::Record;
use crate::dns::record_type::RecordType;

/// TTL assigned to every decoded record, whatever the document stored
pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

/// Host suffix that marks a CNAME when no other setting is given
pub const DEFAULT_RESERVED_SUFFIX: &str = ".dev";

type Result<T> = std::result::Result<T, serde_json::Error>;

/// Storage-native form of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRecord {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ttl: i64,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub text: String,
}

/// A JSON `null` reads as the field's zero value, like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl SubRecord {
    pub fn from_record(record: &Record) -> SubRecord {
        let ttl = i64::try_from(record.ttl.as_secs()).unwrap_or(i64::MAX);
        if record.rtype.is_text() {
            SubRecord {
                text: record.value.clone(),
                ttl,
                ..SubRecord::default()
            }
        } else {
            SubRecord {
                host: record.value.clone(),
                ttl,
                ..SubRecord::default()
            }
        }
    }

    /// Payload for a record of the given type.
    pub fn payload(&self, rtype: RecordType) -> &str {
        if rtype.is_text() {
            &self.text
        } else {
            &self.host
        }
    }
}

/// Serialize a record to the JSON document stored at its key.
pub fn encode(record: &Record) -> Result<String> {
    serde_json::to_string(&SubRecord::from_record(record))
}

fn parse(raw: &[u8]) -> Result<Option<SubRecord>> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw).map(Some)
}

/// Decode a value whose type and name are known from its key.
///
/// Empty input, or a document without the payload field for `rtype`,
/// yields `Ok(None)`.
pub fn decode_typed(rtype: RecordType, name: &str, raw: &[u8]) -> Result<Option<Record>> {
    let sub = match parse(raw)? {
        Some(sub) => sub,
        None => return Ok(None),
    };

    let value = sub.payload(rtype);
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(Record::new(rtype, name, value, DEFAULT_TTL)))
}

/// Decode a value whose type must be inferred from its content.
pub fn decode_inferred(name: &str, raw: &[u8], reserved_suffix: &str) -> Result<Option<Record>> {
    let sub = match parse(raw)? {
        Some(sub) => sub,
        None => return Ok(None),
    };

    Ok(infer_type(&sub, reserved_suffix)
        .map(|(rtype, value)| Record::new(rtype, name, value, DEFAULT_TTL)))
}

/// One row of the type inference table
pub struct InferenceRule {
    pub rtype: RecordType,
    matches: fn(&SubRecord, &str) -> bool,
    value: fn(&SubRecord) -> &str,
}

/// Type inference, first match wins
///
/// The reserved-suffix row must stay ahead of the generic host row, or
/// every CNAME would be listed as an A record.
pub const INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        rtype: RecordType::Cname,
        matches: |sub, suffix| {
            !suffix.is_empty() && !sub.host.is_empty() && sub.host.ends_with(suffix)
        },
        value: |sub| sub.host.as_str(),
    },
    InferenceRule {
        rtype: RecordType::A,
        matches: |sub, _| !sub.host.is_empty(),
        value: |sub| sub.host.as_str(),
    },
    InferenceRule {
        rtype: RecordType::Txt,
        matches: |sub, _| !sub.text.is_empty(),
        value: |sub| sub.text.as_str(),
    },
];

/// Classify a stored document, or `None` when no rule matches.
pub fn infer_type<'a>(sub: &'a SubRecord, reserved_suffix: &str) -> Option<(RecordType, &'a str)> {
    INFERENCE_RULES
        .iter()
        .find(|rule| (rule.matches)(sub, reserved_suffix))
        .map(|rule| (rule.rtype, (rule.value)(sub)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(host: &str, text: &str) -> SubRecord {
        SubRecord {
            host: host.to_string(),
            ttl: 300,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_encode_host_record() {
        let rec = Record::new(RecordType::A, "www", "10.0.0.1", Duration::from_secs(300));
        assert_eq!(encode(&rec).unwrap(), r#"{"host":"10.0.0.1","ttl":300}"#);

        let rec = Record::new(RecordType::Cname, "docs", "www.hubx.dev", Duration::from_secs(60));
        assert_eq!(encode(&rec).unwrap(), r#"{"host":"www.hubx.dev","ttl":60}"#);
    }

    #[test]
    fn test_encode_txt_record() {
        let rec = Record::new(RecordType::Txt, "_acme-challenge", "abc123", Duration::from_secs(120));
        assert_eq!(encode(&rec).unwrap(), r#"{"ttl":120,"text":"abc123"}"#);
    }

    #[test]
    fn test_decode_ignores_stored_ttl() {
        let rec = decode_typed(RecordType::A, "www", br#"{"host":"10.0.0.1","ttl":60}"#)
            .unwrap()
            .unwrap();
        assert_eq!(rec.ttl, DEFAULT_TTL);
        assert_eq!(rec.ttl, Duration::from_secs(1800));

        let rec = decode_inferred("www", br#"{"host":"10.0.0.1","ttl":86400}"#, ".dev")
            .unwrap()
            .unwrap();
        assert_eq!(rec.ttl, DEFAULT_TTL);
    }

    #[test]
    fn test_decode_empty_value_is_skipped() {
        assert_eq!(decode_typed(RecordType::A, "www", b"").unwrap(), None);
        assert_eq!(decode_inferred("www", b"", ".dev").unwrap(), None);
    }

    #[test]
    fn test_decode_malformed_value_is_an_error() {
        assert!(decode_typed(RecordType::A, "www", b"not json").is_err());
        assert!(decode_inferred("www", b"{\"host\":", ".dev").is_err());
    }

    #[test]
    fn test_decode_typed_uses_matching_payload() {
        let raw = br#"{"host":"","ttl":300,"text":"hello"}"#;
        assert_eq!(decode_typed(RecordType::A, "www", raw).unwrap(), None);

        let rec = decode_typed(RecordType::Txt, "www", raw).unwrap().unwrap();
        assert_eq!(rec.rtype, RecordType::Txt);
        assert_eq!(rec.value, "hello");
    }

    #[test]
    fn test_decode_tolerates_extra_skydns_fields() {
        let raw = br#"{"host":"10.0.0.9","port":8080,"priority":10,"weight":5,"ttl":30}"#;
        let rec = decode_inferred("svc", raw, ".dev").unwrap().unwrap();
        assert_eq!(rec.rtype, RecordType::A);
        assert_eq!(rec.value, "10.0.0.9");
    }

    #[test]
    fn test_decode_null_fields_read_as_empty() {
        let rec = decode_inferred("www", br#"{"host":null,"ttl":null,"text":"x"}"#, ".dev")
            .unwrap()
            .unwrap();
        assert_eq!(rec.rtype, RecordType::Txt);
        assert_eq!(rec.value, "x");

        assert_eq!(decode_typed(RecordType::A, "www", br#"{"host":null}"#).unwrap(), None);
        assert!(decode_inferred("www", br#"{"host":7}"#, ".dev").is_err());
    }

    #[test]
    fn test_reserved_suffix_wins_over_host() {
        let s = sub("foo.dev", "");
        assert_eq!(infer_type(&s, ".dev"), Some((RecordType::Cname, "foo.dev")));
    }

    #[test]
    fn test_inference_order() {
        assert_eq!(infer_type(&sub("10.0.0.1", ""), ".dev"), Some((RecordType::A, "10.0.0.1")));
        assert_eq!(infer_type(&sub("", "v=spf1 -all"), ".dev"), Some((RecordType::Txt, "v=spf1 -all")));
        // host takes precedence over text when both are set
        assert_eq!(infer_type(&sub("10.0.0.1", "ignored"), ".dev"), Some((RecordType::A, "10.0.0.1")));
        assert_eq!(infer_type(&sub("", ""), ".dev"), None);
    }

    #[test]
    fn test_custom_and_empty_suffix() {
        let s = sub("api.corp.internal", "");
        assert_eq!(infer_type(&s, ".internal").map(|(t, _)| t), Some(RecordType::Cname));
        assert_eq!(infer_type(&s, ".dev").map(|(t, _)| t), Some(RecordType::A));
        assert_eq!(infer_type(&s, "").map(|(t, _)| t), Some(RecordType::A));
    }

    #[test]
    fn test_suffix_match_is_literal() {
        // "foodev" does not end with ".dev"
        assert_eq!(infer_type(&sub("foodev", ""), ".dev").map(|(t, _)| t), Some(RecordType::A));
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<RecordType> = INFERENCE_RULES.iter().map(|rule| rule.rtype).collect();
        assert_eq!(order, vec![RecordType::Cname, RecordType::A, RecordType::Txt]);
    }
}
