//! Storage abstractions for the service layer
//!
//! The global object only needs `get` and `put` over a flat string-keyed
//! namespace. Values are stored as JSON so any serde type can go through.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Durable key-value map owned by one object instance.
///
/// Implementations can be file-backed, in-memory, or a remote KV. Both calls
/// may fail; callers surface the error without retrying.
#[async_trait]
pub trait KvStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, ServiceError>;
    async fn put(&self, key: &str, value: Value) -> Result<(), ServiceError>;
}
