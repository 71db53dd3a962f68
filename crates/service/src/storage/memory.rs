use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::KvStorage;
use crate::errors::ServiceError;

/// In-process namespace. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl KvStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
