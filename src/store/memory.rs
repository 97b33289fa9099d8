//! In-process key-value store with etcd-style versions

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{KeyValue, KvStore, StoreResult, TxnOutcome};

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    version: i64,
}

/// `MemoryStore` keeps entries in an ordered map behind a single lock
///
/// The conditional put checks and writes under one write guard, so it gives
/// the same create-only guarantee as an etcd transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Store raw bytes without going through a record encoder.
    pub fn put_raw(&self, key: &str, value: &[u8]) {
        self.write_entry(key, value.to_vec());
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn write_entry(&self, key: &str, value: Vec<u8>) {
        let mut entries = self.entries.write();
        let entry = entries.entry(key.to_string()).or_insert(Entry {
            value: Vec::new(),
            version: 0,
        });
        entry.value = value;
        entry.version += 1;
    }

    fn to_key_value(key: &str, entry: &Entry) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: entry.value.clone(),
            version: entry.version,
        }
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<KeyValue>> {
        let entries = self.entries.read();
        Ok(entries.get(key).map(|entry| Self::to_key_value(key, entry)))
    }

    async fn get_prefix(&self, prefix: &str) -> StoreResult<Vec<KeyValue>> {
        let entries = self.entries.read();
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, entry)| Self::to_key_value(key, entry))
            .collect())
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.write_entry(key, value.as_bytes().to_vec());
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<TxnOutcome> {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            return Ok(TxnOutcome::conflict(Some(Self::to_key_value(key, entry))));
        }

        entries.insert(
            key.to_string(),
            Entry {
                value: value.as_bytes().to_vec(),
                version: 1,
            },
        );
        Ok(TxnOutcome::written())
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        let mut entries = self.entries.write();
        Ok(entries.remove(key).map_or(0, |_| 1))
    }
}
