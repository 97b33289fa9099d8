//! The canonical record exchanged with callers

use std::fmt;
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};

use crate::dns::record_type::RecordType;

/// `Record` is the cross-system representation of a DNS record
///
/// `name` is relative to the zone it is stored under, e.g. `www` for
/// `www.example.com` in zone `example.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub rtype: RecordType,
    pub name: String,
    pub value: String,
    #[serde(with = "ttl_seconds")]
    pub ttl: Duration,
}

impl Record {
    pub fn new<N, V>(rtype: RecordType, name: N, value: V, ttl: Duration) -> Record
    where
        N: Into<String>,
        V: Into<String>,
    {
        Record {
            rtype,
            name: name.into(),
            value: value.into(),
            ttl,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.name,
            self.ttl.as_secs(),
            self.rtype,
            self.value
        )
    }
}

/// TTLs travel as whole seconds
mod ttl_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(ttl.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
