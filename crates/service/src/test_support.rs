#![cfg(test)]
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;
use crate::storage::{KvStorage, MemoryStorage};

/// Wraps a [`MemoryStorage`], counting calls and optionally failing every `put`.
#[derive(Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_puts: AtomicBool,
    pub puts: AtomicUsize,
}

impl FlakyStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStorage for FlakyStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("injected put failure".into()));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        // widen the read-modify-write window so unserialized callers would race
        tokio::task::yield_now().await;
        self.inner.put(key, value).await
    }
}
