//! Invocation counter

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{Call, CallInterceptor};
use crate::cache::keys::MethodKey;
use crate::kv::KeyValueStore;
use crate::types::{Result, StowageError};

/// Increments a persisted counter at the method's qualified name.
///
/// The increment happens before the operation runs, so a failing call is
/// still counted. The counter therefore means "calls started".
pub struct CallCounter {
    store: Arc<dyn KeyValueStore>,
}

impl CallCounter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current count for `method`, zero if it was never called
    pub async fn count(&self, method: &MethodKey) -> Result<u64> {
        read_count(self.store.as_ref(), method).await
    }
}

/// Read the counter for `method` from `store`
pub async fn read_count(store: &dyn KeyValueStore, method: &MethodKey) -> Result<u64> {
    match store.get(&method.counter_key()).await? {
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                StowageError::Decode(format!("counter '{}' is not an integer", method))
            }),
        None => Ok(0),
    }
}

#[async_trait]
impl CallInterceptor for CallCounter {
    fn name(&self) -> &'static str {
        "count_calls"
    }

    async fn before(&self, call: &Call) -> Result<()> {
        let count = self.store.incr(&call.method.counter_key()).await?;
        debug!(method = %call.method, count, "counted call");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[tokio::test]
    async fn test_counts_each_before() {
        let store = Arc::new(MemoryStore::new());
        let counter = CallCounter::new(store.clone());
        let method = MethodKey::new("Cache", "store");
        let call = Call::new(method.clone(), "(1,)");

        assert_eq!(counter.count(&method).await.unwrap(), 0);
        for _ in 0..3 {
            counter.before(&call).await.unwrap();
        }
        counter.after(&call, "ignored").await.unwrap();

        assert_eq!(counter.count(&method).await.unwrap(), 3);
        assert_eq!(store.get("Cache.store").await.unwrap(), Some(b"3".to_vec()));
    }

    #[tokio::test]
    async fn test_non_integer_counter_is_decode_error() {
        let store = Arc::new(MemoryStore::new());
        store.set("Cache.store", b"many").await.unwrap();
        let err = read_count(store.as_ref(), &MethodKey::from("Cache.store"))
            .await
            .unwrap_err();
        assert!(matches!(err, StowageError::Decode(_)));
    }
}
