//! Ordered demo item collection.
//!
//! # Invariants
//! - `id` is unique within the persisted collection.
//! - Insertion order is preserved across add/update/delete.
//! - Every mutation rewrites the whole collection in a single `put`.
//! - Seeding happens at most once: once `demo_items` exists it is never reseeded,
//!   even when it has been emptied.

use common::types::{DemoItem, DemoItemPatch};
use tracing::{debug, info};
use uuid::Uuid;

use super::{GlobalObject, ITEMS_KEY};
use crate::errors::ServiceError;

/// Collection persisted on first access.
pub fn seed_items() -> Vec<DemoItem> {
    vec![
        DemoItem::new("1", "Item 1", 10.0),
        DemoItem::new("2", "Item 2", 20.0),
        DemoItem::new("3", "Item 3", 30.0),
    ]
}

impl GlobalObject {
    /// Persist the seed set if no collection has ever been stored.
    ///
    /// Returns `true` when this call did the seeding.
    pub async fn ensure_seeded(&self) -> Result<bool, ServiceError> {
        let _guard = self.gate.lock().await;
        let (_, seeded) = self.load_or_seed().await?;
        Ok(seeded)
    }

    /// Full collection in insertion order, seeding it first if needed.
    pub async fn list_items(&self) -> Result<Vec<DemoItem>, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("items_list");
        let (items, _) = self.load_or_seed().await?;
        Ok(items)
    }

    /// Append `item`. An empty id is replaced with a generated one; a duplicate
    /// id is rejected and the collection is left unchanged.
    pub async fn add_item(&self, mut item: DemoItem) -> Result<Vec<DemoItem>, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("items_add");
        let (mut items, _) = self.load_or_seed().await?;

        if item.id.trim().is_empty() {
            item.id = Uuid::new_v4().to_string();
        }
        if items.iter().any(|i| i.id == item.id) {
            return Err(ServiceError::duplicate_id(&item.id));
        }

        debug!(id = %item.id, "adding item");
        items.push(item);
        self.store(ITEMS_KEY, &items).await?;
        Ok(items)
    }

    /// Apply `patch` to the item with `id`. Unknown ids are a no-op.
    pub async fn update_item(&self, id: &str, patch: DemoItemPatch) -> Result<Vec<DemoItem>, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("items_update");
        let (mut items, _) = self.load_or_seed().await?;

        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                if let Some(name) = patch.name {
                    item.name = name;
                }
                if let Some(value) = patch.value {
                    item.value = value;
                }
            }
            None => debug!(%id, "update of unknown item ignored"),
        }

        self.store(ITEMS_KEY, &items).await?;
        Ok(items)
    }

    /// Remove the item with `id`. Unknown ids are a no-op.
    pub async fn delete_item(&self, id: &str) -> Result<Vec<DemoItem>, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("items_delete");
        let (mut items, _) = self.load_or_seed().await?;

        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            debug!(%id, "delete of unknown item ignored");
        }

        self.store(ITEMS_KEY, &items).await?;
        Ok(items)
    }

    // caller holds the gate
    async fn load_or_seed(&self) -> Result<(Vec<DemoItem>, bool), ServiceError> {
        if let Some(items) = self.load::<Vec<DemoItem>>(ITEMS_KEY).await? {
            return Ok((items, false));
        }
        let seed = seed_items();
        self.store(ITEMS_KEY, &seed).await?;
        info!(count = seed.len(), "seeded demo items");
        Ok((seed, true))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use common::types::{DemoItem, DemoItemPatch};

    use super::seed_items;
    use crate::errors::ServiceError;
    use crate::object::GlobalObject;
    use crate::storage::{JsonFileStorage, MemoryStorage};
    use crate::test_support::FlakyStorage;

    #[tokio::test]
    async fn list_seeds_exactly_once() -> Result<(), anyhow::Error> {
        let storage = FlakyStorage::new();
        let obj = GlobalObject::new(storage.clone());

        let first = obj.list_items().await?;
        let second = obj.list_items().await?;
        assert_eq!(first, seed_items());
        assert_eq!(second, first);
        assert_eq!(storage.put_count(), 1);

        assert!(!obj.ensure_seeded().await?);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_reads_share_one_seed() -> Result<(), anyhow::Error> {
        let storage = FlakyStorage::new();
        let obj = GlobalObject::new(storage.clone());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let obj = Arc::clone(&obj);
            handles.push(tokio::spawn(async move { obj.ensure_seeded().await }));
        }
        let mut seeded = 0;
        for h in handles {
            if h.await?? {
                seeded += 1;
            }
        }
        assert_eq!(seeded, 1);
        assert_eq!(storage.put_count(), 1);
        assert_eq!(obj.list_items().await?.len(), seed_items().len());
        Ok(())
    }

    #[tokio::test]
    async fn add_update_delete_roundtrip() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        let base = obj.list_items().await?;

        let after_add = obj.add_item(DemoItem::new("x5", "Widget", 10.0)).await?;
        assert_eq!(after_add.len(), base.len() + 1);
        assert_eq!(obj.list_items().await?.iter().filter(|i| i.id == "x5").count(), 1);
        assert_eq!(after_add.last().map(|i| i.id.as_str()), Some("x5"));

        let after_update = obj
            .update_item("x5", DemoItemPatch { value: Some(20.0), ..Default::default() })
            .await?;
        let x5 = after_update.iter().find(|i| i.id == "x5").cloned();
        assert_eq!(x5, Some(DemoItem::new("x5", "Widget", 20.0)));
        assert_eq!(&after_update[..base.len()], &base[..]);

        let after_delete = obj.delete_item("x5").await?;
        assert_eq!(after_delete, base);
        let again = obj.delete_item("x5").await?;
        assert_eq!(again, base);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_is_noop() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        let base = obj.list_items().await?;
        let res = obj
            .update_item("missing", DemoItemPatch { name: Some("x".into()), value: Some(1.0) })
            .await?;
        assert_eq!(res, base);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        obj.add_item(DemoItem::new("x5", "Widget", 10.0)).await?;
        let before = obj.list_items().await?;

        let res = obj.add_item(DemoItem::new("x5", "Other", 99.0)).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(obj.list_items().await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn blank_id_gets_generated() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        let items = obj.add_item(DemoItem::new("", "Anon", 1.5)).await?;
        let added = items.last().cloned().ok_or_else(|| anyhow::anyhow!("empty"))?;
        assert_eq!(added.name, "Anon");
        assert!(uuid::Uuid::parse_str(&added.id).is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn emptied_collection_is_not_reseeded() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        for item in obj.list_items().await? {
            obj.delete_item(&item.id).await?;
        }
        assert!(obj.list_items().await?.is_empty());
        assert!(!obj.ensure_seeded().await?);
        Ok(())
    }

    #[tokio::test]
    async fn failed_put_leaves_collection_unchanged() -> Result<(), anyhow::Error> {
        let storage = FlakyStorage::new();
        let obj = GlobalObject::new(storage.clone());
        let base = obj.list_items().await?;

        storage.fail_puts(true);
        assert!(matches!(obj.add_item(DemoItem::new("x9", "Nope", 0.0)).await, Err(ServiceError::Storage(_))));
        assert!(matches!(obj.delete_item("1").await, Err(ServiceError::Storage(_))));
        storage.fail_puts(false);

        assert_eq!(obj.list_items().await?, base);
        Ok(())
    }

    #[tokio::test]
    async fn items_and_counter_survive_restart() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("global_object_{}.json", uuid::Uuid::new_v4()));
        {
            let obj = GlobalObject::new(JsonFileStorage::new(&tmp).await?);
            obj.add_item(DemoItem::new("x5", "Widget", 10.0)).await?;
            obj.increment(7).await?;
        }
        let obj = GlobalObject::new(JsonFileStorage::new(&tmp).await?);
        let items = obj.list_items().await?;
        assert_eq!(items.len(), seed_items().len() + 1);
        assert_eq!(obj.counter_value().await?, 7);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
