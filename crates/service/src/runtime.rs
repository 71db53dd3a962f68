//! Runtime environment helpers
//!
//! Keeps binary and server crates importing `service::runtime` without
//! depending directly on `common::env` or the concrete storage types.

use std::sync::Arc;

use configs::{StorageBackend, StorageConfig};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::{JsonFileStorage, KvStorage, MemoryStorage};

/// Ensure expected directories exist; warn on missing optional ones.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(frontend_dir, data_dir).await
}

/// Build the storage backend selected by `[storage]`.
pub async fn open_storage(cfg: &StorageConfig) -> Result<Arc<dyn KvStorage>, ServiceError> {
    match cfg.backend {
        StorageBackend::File => {
            let path = cfg.file_path();
            info!(path = %path.display(), "using json file storage");
            Ok(JsonFileStorage::new(path).await?)
        }
        StorageBackend::Memory => {
            info!("using in-memory storage; state is lost on restart");
            Ok(MemoryStorage::new())
        }
    }
}
