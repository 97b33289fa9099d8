//! Storage key layout
//!
//! Records live under `<prefix>/<reversed zone labels>/<name>[/<TYPE>]`:
//!
//! ```text
//! /skydns/com/example/www/A          A record www.example.com
//! /skydns/com/example/www/CNAME      CNAME record www.example.com
//! /skydns/com/example/_acme          TXT record _acme.example.com
//! ```
//!
//! TXT keys carry no type segment, so a name holds at most one TXT value.

use crate::dns::record::Record;
use crate::dns::record_type::RecordType;

/// Strip one trailing dot, so `example.com.` and `example.com` address the
/// same keys.
pub fn trim_zone(zone: &str) -> &str {
    zone.strip_suffix('.').unwrap_or(zone)
}

/// `example.com` -> `com/example`
pub fn reverse_domain(domain: &str) -> String {
    domain.split('.').rev().collect::<Vec<&str>>().join("/")
}

/// Path every key of `zone` starts with, without a trailing slash.
pub fn zone_path(prefix: &str, zone: &str) -> String {
    format!("{}/{}", prefix, reverse_domain(trim_zone(zone)))
}

/// Key a record is stored at.
pub fn build_key(prefix: &str, zone: &str, record: &Record) -> String {
    let base = format!("{}/{}", zone_path(prefix, zone), record.name);
    if record.rtype == RecordType::Txt {
        base
    } else {
        format!("{}/{}", base, record.rtype)
    }
}

/// Record name of a stored key: the first path segment after `path_prefix`.
///
/// `path_prefix` may be given with or without its trailing slash. The apex
/// name is empty, so `<path>//A` and `<path>/` both yield `Some("")`.
/// Returns `None` when the key is not below `path_prefix`.
pub fn extract_name<'a>(path_prefix: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(path_prefix)?;
    let rest = if path_prefix.ends_with('/') {
        rest
    } else {
        rest.strip_prefix('/')?
    };
    rest.split('/').next()
}

/// Name and type recovered from a full key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    pub name: String,
    pub rtype: RecordType,
}

/// Recover name and type from a key below `zone_path`.
///
/// A key without a type segment is a TXT key. Keys with deeper paths or an
/// unknown type segment are not record keys of this zone.
pub fn parse_key(zone_path: &str, key: &str) -> Option<ParsedKey> {
    let rest = key.strip_prefix(zone_path)?.strip_prefix('/')?;
    let mut segments = rest.split('/');

    let name = segments.next()?;
    let rtype = match segments.next() {
        None => RecordType::Txt,
        Some(segment) => segment.parse().ok()?,
    };
    if segments.next().is_some() {
        return None;
    }

    Some(ParsedKey {
        name: name.to_string(),
        rtype,
    })
}
