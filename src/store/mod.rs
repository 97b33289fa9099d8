//! Key-value store abstraction the record provider is built on
//!
//! The provider needs four primitives from its backing store: prefix reads,
//! unconditional put, a create-only conditional put, and delete. `KvStore`
//! adds an exact read for inspection and captures them with etcd v3 semantics: every key carries
//! a version that is zero while the key is absent and grows by one on each
//! put.
//!
//! # Module Structure
//!
//! * `memory` - In-process store, used by tests and embedding callers
//! * `etcd` - etcd v3 adapter (cargo feature `etcd`)

use async_trait::async_trait;

mod error;
pub mod memory;

#[cfg(feature = "etcd")]
pub mod etcd;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

#[cfg(feature = "etcd")]
pub use etcd::EtcdStore;

/// A stored entry as returned by reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
    /// Number of puts since the key was created; 0 means absent
    pub version: i64,
}

/// Result of a create-only conditional write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxnOutcome {
    /// True when the key was absent and the value was written
    pub succeeded: bool,
    /// The entry read by the else branch when the key already existed
    pub existing: Option<KeyValue>,
}

impl TxnOutcome {
    pub fn written() -> Self {
        TxnOutcome {
            succeeded: true,
            existing: None,
        }
    }

    pub fn conflict(existing: Option<KeyValue>) -> Self {
        TxnOutcome {
            succeeded: false,
            existing,
        }
    }
}

/// Backing key-value store
///
/// Every method is one round-trip. Implementations do not retry and do not
/// bound their own latency; deadlines are applied by the caller.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a single key.
    ///
    /// The provider never calls this; it is there for callers and tests that
    /// inspect what an operation left in the store.
    async fn get(&self, key: &str) -> StoreResult<Option<KeyValue>>;

    /// Read every key starting with `prefix`, in key order.
    async fn get_prefix(&self, prefix: &str) -> StoreResult<Vec<KeyValue>>;

    /// Write `value` at `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// If `version(key) == 0` put `value`, else read the current entry.
    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<TxnOutcome>;

    /// Remove `key`, returning how many keys were deleted (0 or 1).
    async fn delete(&self, key: &str) -> StoreResult<u64>;
}

#[async_trait]
impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> StoreResult<Option<KeyValue>> {
        (**self).get(key).await
    }

    async fn get_prefix(&self, prefix: &str) -> StoreResult<Vec<KeyValue>> {
        (**self).get_prefix(prefix).await
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).put(key, value).await
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<TxnOutcome> {
        (**self).put_if_absent(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        (**self).delete(key).await
    }
}
