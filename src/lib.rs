//! SkyDNS record provider
//!
//! Maps DNS records to the hierarchical key space SkyDNS and CoreDNS read
//! from etcd, and back.
//!
//! # Features
//!
//! * Reversed-domain key layout (`/skydns/com/example/www/A`)
//! * JSON record documents (`{"host": "10.0.0.1", "ttl": 300}`)
//! * Content-based type inference when listing a zone
//! * Create-only appends guarded by a store-side version check
//! * Per-call deadlines on every store round-trip
//!
//! # Architecture
//!
//! The crate is divided into two modules:
//! * `dns` - Records, codecs and the record provider
//! * `store` - Key-value store abstraction and its adapters

/// Records, codecs and the record provider
pub mod dns;

/// Key-value store abstraction and adapters
pub mod store;
