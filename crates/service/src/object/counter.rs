use tracing::debug;

use super::{GlobalObject, COUNTER_KEY};
use crate::errors::ServiceError;

impl GlobalObject {
    /// Current counter value; 0 when never written.
    pub async fn counter_value(&self) -> Result<i64, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("counter_read");
        self.read_counter().await
    }

    /// Add `amount` (may be negative) and return the new value.
    pub async fn increment(&self, amount: i64) -> Result<i64, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("counter_increment");
        self.apply_delta(amount).await
    }

    /// Equivalent to `increment(-amount)`.
    pub async fn decrement(&self, amount: i64) -> Result<i64, ServiceError> {
        let _guard = self.gate.lock().await;
        common::metrics::record_op("counter_decrement");
        let delta = amount
            .checked_neg()
            .ok_or_else(|| ServiceError::Validation(format!("cannot negate {amount}")))?;
        self.apply_delta(delta).await
    }

    async fn read_counter(&self) -> Result<i64, ServiceError> {
        Ok(self.load::<i64>(COUNTER_KEY).await?.unwrap_or(0))
    }

    // caller holds the gate
    async fn apply_delta(&self, delta: i64) -> Result<i64, ServiceError> {
        let current = self.read_counter().await?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| ServiceError::Validation(format!("counter overflow: {current} + {delta}")))?;
        self.store(COUNTER_KEY, &next).await?;
        debug!(current, delta, next, "counter updated");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::ServiceError;
    use crate::object::GlobalObject;
    use crate::storage::MemoryStorage;
    use crate::test_support::FlakyStorage;

    #[tokio::test]
    async fn counter_defaults_to_zero_and_goes_negative() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        assert_eq!(obj.counter_value().await?, 0);
        assert_eq!(obj.increment(1).await?, 1);
        assert_eq!(obj.decrement(5).await?, -4);
        assert_eq!(obj.increment(-2).await?, -6);
        assert_eq!(obj.counter_value().await?, -6);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deltas_sum_exactly() -> Result<(), anyhow::Error> {
        let storage = FlakyStorage::new();
        let obj = GlobalObject::new(storage.clone());

        let deltas: Vec<i64> = (1..=50).map(|i| if i % 3 == 0 { -i } else { i }).collect();
        let expected: i64 = deltas.iter().sum();

        let mut handles = Vec::new();
        for d in deltas {
            let obj = Arc::clone(&obj);
            handles.push(tokio::spawn(async move {
                if d >= 0 { obj.increment(d).await } else { obj.decrement(-d).await }
            }));
        }
        for h in handles {
            h.await??;
        }

        assert_eq!(obj.counter_value().await?, expected);
        assert_eq!(storage.put_count(), 50);
        Ok(())
    }

    #[tokio::test]
    async fn failed_put_surfaces_and_keeps_previous_value() -> Result<(), anyhow::Error> {
        let storage = FlakyStorage::new();
        let obj = GlobalObject::new(storage.clone());
        obj.increment(10).await?;

        storage.fail_puts(true);
        assert!(matches!(obj.increment(1).await, Err(ServiceError::Storage(_))));
        storage.fail_puts(false);

        assert_eq!(obj.counter_value().await?, 10);
        Ok(())
    }

    #[tokio::test]
    async fn overflow_is_rejected() -> Result<(), anyhow::Error> {
        let obj = GlobalObject::new(MemoryStorage::new());
        obj.increment(i64::MAX).await?;
        assert!(matches!(obj.increment(1).await, Err(ServiceError::Validation(_))));
        assert!(matches!(obj.decrement(i64::MIN).await, Err(ServiceError::Validation(_))));
        assert_eq!(obj.counter_value().await?, i64::MAX);
        Ok(())
    }
}
