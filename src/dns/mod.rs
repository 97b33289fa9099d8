//! DNS records over a SkyDNS key space
//!
//! # Module Structure
//!
//! * `record_type` - Record type definitions
//! * `record` - The canonical record exchanged with callers
//! * `record_codec` - Record <-> stored JSON document
//! * `key_codec` - Zone and record identity <-> storage key
//! * `provider` - List, append, set and delete over a `KvStore`
//! * `context` - Provider configuration
//! * `logging` - Tracing setup and correlation ids

/// DNS record type definitions
pub mod record_type;

/// Canonical record representation
pub mod record;

/// Stored document encoding and type inference
pub mod record_codec;

/// Storage key layout
pub mod key_codec;

/// Record provider operations
pub mod provider;

/// Provider configuration
pub mod context;

/// Enhanced error types for provider operations
pub mod errors;

/// Structured logging with correlation IDs
pub mod logging;


pub use errors::{ProviderError, ProviderResult};
pub use provider::{RecordAppender, RecordDeleter, RecordGetter, RecordSetter, SkyDnsProvider};
pub use record::Record;
pub use record_type::RecordType;
