//! The single global object.
//!
//! One `GlobalObject` is built at startup with its storage injected and is
//! shared through the router state. Every operation holds `gate` for its
//! whole read-modify-write sequence, so callers on the same instance never
//! observe a half-applied mutation and increments are never lost.
//!
//! # Persisted keys
//! - `counter_value`: integer, see [`counter`]
//! - `demo_items`: ordered array of items, see [`items`]

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::storage::KvStorage;

pub mod counter;
pub mod items;

pub use items::seed_items;

pub const COUNTER_KEY: &str = "counter_value";
pub const ITEMS_KEY: &str = "demo_items";

pub struct GlobalObject {
    storage: Arc<dyn KvStorage>,
    gate: Mutex<()>,
}

impl GlobalObject {
    pub fn new(storage: Arc<dyn KvStorage>) -> Arc<Self> {
        Arc::new(Self { storage, gate: Mutex::new(()) })
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ServiceError> {
        let raw = self.storage.get(key).await.map_err(|e| {
            common::metrics::record_storage_error("get");
            e
        })?;
        match raw {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v)
                .map(Some)
                .map_err(|e| ServiceError::Storage(format!("decode {key}: {e}"))),
        }
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ServiceError> {
        let v = serde_json::to_value(value).map_err(ServiceError::storage)?;
        self.storage.put(key, v).await.map_err(|e| {
            common::metrics::record_storage_error("put");
            e
        })
    }
}
