//! Record provider backed by a SkyDNS key space
//!
//! `SkyDnsProvider` implements list, append, set and delete on top of any
//! `KvStore`. Every record in a call is an independent store round-trip:
//! records are processed in input order, the first failure stops the loop,
//! and writes already committed stay committed.
//!
//! ## Consistency
//!
//! | operation | store primitive                                   |
//! |-----------|---------------------------------------------------|
//! | list      | prefix read of the zone path                      |
//! | append    | `if version(key) == 0 then put else get`          |
//! | set       | unconditional put                                 |
//! | delete    | delete                                            |
//!
//! The conditional put is the only concurrency guard. Two appends of the
//! same key race in the store and exactly one of them writes; the provider
//! itself holds no locks and caches nothing.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn, Instrument};

use crate::dns::context::ProviderConfig;
use crate::dns::errors::{ProviderError, ProviderResult};
use crate::dns::key_codec::{build_key, extract_name, trim_zone, zone_path};
use crate::dns::logging::CorrelationContext;
use crate::dns::record::Record;
use crate::dns::record_codec::{decode_inferred, decode_typed, encode};
use crate::store::{KvStore, StoreResult};

/// Lists the records of a zone
#[async_trait]
pub trait RecordGetter {
    async fn get_records(&self, zone: &str) -> ProviderResult<Vec<Record>>;
}

/// Creates records that do not exist yet, returning the ones it created
#[async_trait]
pub trait RecordAppender {
    async fn append_records(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>>;
}

/// Creates or replaces records, returning the ones it wrote
#[async_trait]
pub trait RecordSetter {
    async fn set_records(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>>;
}

/// Removes records, returning the ones it removed
#[async_trait]
pub trait RecordDeleter {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>>;
}

pub struct SkyDnsProvider<S> {
    store: S,
    prefix: String,
    reserved_suffix: String,
    request_timeout: Duration,
}

impl<S: KvStore> SkyDnsProvider<S> {
    pub fn new(store: S, config: &ProviderConfig) -> SkyDnsProvider<S> {
        SkyDnsProvider {
            store,
            prefix: config.prefix.clone(),
            reserved_suffix: config.reserved_suffix.clone(),
            request_timeout: config.request_timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Storage key of `record` in `zone`.
    pub fn key_for(&self, zone: &str, record: &Record) -> String {
        build_key(&self.prefix, zone, record)
    }

    /// Run one store round-trip under the request deadline.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> ProviderResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result.map_err(ProviderError::from),
            Err(_) => Err(ProviderError::StoreTimeout {
                operation,
                after: self.request_timeout,
            }),
        }
    }

    /// All records stored under `zone`.
    ///
    /// Types are inferred from the stored documents. Entries that are empty,
    /// unclassifiable or malformed are skipped, so one corrupt value never
    /// hides the rest of the zone.
    pub async fn list(&self, zone: &str) -> ProviderResult<Vec<Record>> {
        let zone = trim_zone(zone);
        let ctx = CorrelationContext::new("list", zone);

        async {
            let path = format!("{}/", zone_path(&self.prefix, zone));
            let kvs = self.bounded("get", self.store.get_prefix(&path)).await?;

            let mut records = Vec::with_capacity(kvs.len());
            for kv in &kvs {
                let name = match extract_name(&path, &kv.key) {
                    Some(name) => name,
                    None => continue,
                };

                match decode_inferred(name, &kv.value, &self.reserved_suffix) {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => debug!(key = %kv.key, "no record in stored value"),
                    Err(e) => warn!(key = %kv.key, error = %e, "skipping malformed record"),
                }
            }

            info!(
                found = records.len(),
                scanned = kvs.len(),
                elapsed_ms = ctx.elapsed().as_millis() as u64,
                "listed records"
            );
            Ok::<_, ProviderError>(records)
        }
        .instrument(ctx.span())
        .await
    }

    /// Create each record whose key is still absent.
    ///
    /// A record whose key already exists is left untouched and left out of
    /// the result; that is a normal outcome, not an error. The value found at
    /// such a key must still parse, otherwise the batch stops with
    /// `ProviderError::Decode`.
    pub async fn append(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>> {
        let zone = trim_zone(zone);
        let ctx = CorrelationContext::new("append", zone);

        async {
            let mut appended = Vec::new();
            for record in records {
                let key = self.key_for(zone, record);
                let value = encode(record).map_err(ProviderError::Encode)?;

                let outcome = self
                    .bounded("txn", self.store.put_if_absent(&key, &value))
                    .await?;

                if outcome.succeeded {
                    debug!(key = %key, record_type = %record.rtype, "record created");
                    appended.push(record.clone());
                    continue;
                }

                let existing = match outcome.existing {
                    Some(kv) => decode_typed(record.rtype, &record.name, &kv.value)
                        .map_err(|source| ProviderError::Decode {
                            key: key.clone(),
                            source,
                        })?,
                    None => None,
                };
                let existing_value = existing.map(|r| r.value);
                info!(key = %key, existing = ?existing_value, "record already exists, skipping");
            }

            info!(requested = records.len(), appended = appended.len(), "appended records");
            Ok::<_, ProviderError>(appended)
        }
        .instrument(ctx.span())
        .await
    }

    /// Write each record, replacing whatever its key held.
    pub async fn set(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>> {
        let zone = trim_zone(zone);
        let ctx = CorrelationContext::new("set", zone);

        async {
            let mut written = Vec::with_capacity(records.len());
            for record in records {
                let key = self.key_for(zone, record);
                let value = encode(record).map_err(ProviderError::Encode)?;

                self.bounded("put", self.store.put(&key, &value)).await?;
                debug!(key = %key, record_type = %record.rtype, "record written");
                written.push(record.clone());
            }

            info!(written = written.len(), "set records");
            Ok::<_, ProviderError>(written)
        }
        .instrument(ctx.span())
        .await
    }

    /// Remove the key of each record.
    ///
    /// A record is reported once the store confirmed its key was removed.
    /// Records whose key was already absent are left out of the result.
    pub async fn delete(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>> {
        let zone = trim_zone(zone);
        let ctx = CorrelationContext::new("delete", zone);

        async {
            let mut removed = Vec::new();
            for record in records {
                let key = self.key_for(zone, record);

                let deleted = self.bounded("delete", self.store.delete(&key)).await?;
                if deleted == 0 {
                    debug!(key = %key, "record already absent");
                    continue;
                }

                debug!(key = %key, record_type = %record.rtype, "record deleted");
                removed.push(record.clone());
            }

            info!(requested = records.len(), deleted = removed.len(), "deleted records");
            Ok::<_, ProviderError>(removed)
        }
        .instrument(ctx.span())
        .await
    }
}

#[async_trait]
impl<S: KvStore> RecordGetter for SkyDnsProvider<S> {
    async fn get_records(&self, zone: &str) -> ProviderResult<Vec<Record>> {
        self.list(zone).await
    }
}

#[async_trait]
impl<S: KvStore> RecordAppender for SkyDnsProvider<S> {
    async fn append_records(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>> {
        self.append(zone, records).await
    }
}

#[async_trait]
impl<S: KvStore> RecordSetter for SkyDnsProvider<S> {
    async fn set_records(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>> {
        self.set(zone, records).await
    }
}

#[async_trait]
impl<S: KvStore> RecordDeleter for SkyDnsProvider<S> {
    async fn delete_records(&self, zone: &str, records: &[Record]) -> ProviderResult<Vec<Record>> {
        self.delete(zone, records).await
    }
}
