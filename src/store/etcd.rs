//! etcd v3 adapter for `KvStore`

use std::time::Duration;

use async_trait::async_trait;
use etcd_client::{
    Client, Compare, CompareOp, ConnectOptions, GetOptions, KvClient, Txn, TxnOp,
    TxnOpResponse,
};
use tracing::{debug, info};

use super::{KeyValue, KvStore, StoreError, StoreResult, TxnOutcome};
use crate::dns::context::ProviderConfig;

// gRPC status codes, see google.golang.org/grpc/codes
const GRPC_DEADLINE_EXCEEDED: i32 = 4;
const GRPC_UNAVAILABLE: i32 = 14;

/// `EtcdStore` talks to an etcd cluster through one multiplexed channel
///
/// The kv client is cheap to clone, so each call works on its own handle and
/// the store can be shared between tasks without locking.
#[derive(Clone)]
pub struct EtcdStore {
    kv: KvClient,
    endpoints: Vec<String>,
    request_timeout: Duration,
}

impl EtcdStore {
    pub async fn connect(config: &ProviderConfig) -> StoreResult<EtcdStore> {
        let options = ConnectOptions::new()
            .with_connect_timeout(config.dial_timeout)
            .with_timeout(config.request_timeout);

        let client = Client::connect(&config.endpoints, Some(options))
            .await
            .map_err(|e| {
                StoreError::unavailable(e.to_string()).with_endpoint(&config.endpoints.join(","))
            })?;

        info!(endpoints = ?config.endpoints, "connected to etcd");

        Ok(EtcdStore {
            kv: client.kv_client(),
            endpoints: config.endpoints.clone(),
            request_timeout: config.request_timeout,
        })
    }

    fn map_err(&self, operation: &'static str, err: etcd_client::Error) -> StoreError {
        match err {
            etcd_client::Error::TransportError(e) => {
                StoreError::unavailable(e.to_string()).with_endpoint(&self.endpoints.join(","))
            }
            etcd_client::Error::GRpcStatus(status) => match status.code() as i32 {
                GRPC_DEADLINE_EXCEEDED => StoreError::Timeout {
                    operation,
                    after: self.request_timeout,
                },
                GRPC_UNAVAILABLE => StoreError::unavailable(status.message().to_string())
                    .with_endpoint(&self.endpoints.join(",")),
                _ => StoreError::Backend(format!("{}: {}", operation, status.message())),
            },
            other => StoreError::Backend(format!("{}: {}", operation, other)),
        }
    }

    fn to_key_value(kv: &etcd_client::KeyValue) -> KeyValue {
        KeyValue {
            key: String::from_utf8_lossy(kv.key()).into_owned(),
            value: kv.value().to_vec(),
            version: kv.version(),
        }
    }
}

#[async_trait]
impl KvStore for EtcdStore {
    async fn get(&self, key: &str) -> StoreResult<Option<KeyValue>> {
        let mut kv = self.kv.clone();
        let resp = kv.get(key, None).await.map_err(|e| self.map_err("get", e))?;
        Ok(resp.kvs().first().map(Self::to_key_value))
    }

    async fn get_prefix(&self, prefix: &str) -> StoreResult<Vec<KeyValue>> {
        let mut kv = self.kv.clone();
        let resp = kv
            .get(prefix, Some(GetOptions::new().with_prefix()))
            .await
            .map_err(|e| self.map_err("get", e))?;
        debug!(prefix, count = resp.kvs().len(), "prefix read");
        Ok(resp.kvs().iter().map(Self::to_key_value).collect())
    }

    async fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut kv = self.kv.clone();
        kv.put(key, value, None)
            .await
            .map_err(|e| self.map_err("put", e))?;
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> StoreResult<TxnOutcome> {
        let txn = Txn::new()
            .when(vec![Compare::version(key, CompareOp::Equal, 0)])
            .and_then(vec![TxnOp::put(key, value, None)])
            .or_else(vec![TxnOp::get(key, None)]);

        let mut kv = self.kv.clone();
        let resp = kv.txn(txn).await.map_err(|e| self.map_err("txn", e))?;
        if resp.succeeded() {
            return Ok(TxnOutcome::written());
        }

        let existing = resp.op_responses().into_iter().find_map(|op| match op {
            TxnOpResponse::Get(get) => get.kvs().first().map(Self::to_key_value),
            _ => None,
        });
        Ok(TxnOutcome::conflict(existing))
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        let mut kv = self.kv.clone();
        let resp = kv
            .delete(key, None)
            .await
            .map_err(|e| self.map_err("delete", e))?;
        Ok(resp.deleted().max(0) as u64)
    }
}
