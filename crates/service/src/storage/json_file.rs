use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::KvStorage;
use crate::errors::ServiceError;

/// JSON file-backed key-value namespace.
///
/// The whole map lives in one JSON object on disk. Each `put` writes the
/// updated map to a sibling temp file and renames it over the original, and
/// only then updates the in-memory copy, so a failed write leaves both the
/// file and subsequent reads at the previous state.
#[derive(Clone)]
pub struct JsonFileStorage {
    inner: Arc<RwLock<HashMap<String, Value>>>,
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the namespace at `path`. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }

        let map: HashMap<String, Value> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("corrupt store {}: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<String, Value> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(ServiceError::storage)?)
                    .await
                    .map_err(ServiceError::storage)?;
                empty
            }
            Err(e) => return Err(ServiceError::storage(e)),
        };

        debug!(path = %file_path.display(), keys = map.len(), "opened json file storage");
        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    async fn save(&self, map: &HashMap<String, Value>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map).map_err(ServiceError::storage)?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::storage)?;
        Ok(())
    }
}

#[async_trait]
impl KvStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key.to_string(), value);
        self.save(&next).await?;
        *map = next;
        Ok(())
    }
}
