//! Argument/result history recorder

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{Call, CallInterceptor};
use crate::kv::KeyValueStore;
use crate::types::Result;

/// Appends each call's arguments to `<method>:inputs` before the operation
/// and its result to `<method>:outputs` after it.
///
/// The lists stay aligned only while calls to the method are sequential and
/// succeed. A failed call leaves an unmatched input.
pub struct CallHistory {
    store: Arc<dyn KeyValueStore>,
}

impl CallHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CallInterceptor for CallHistory {
    fn name(&self) -> &'static str {
        "call_history"
    }

    async fn before(&self, call: &Call) -> Result<()> {
        let len = self
            .store
            .rpush(&call.method.inputs_key(), call.args.as_bytes())
            .await?;
        debug!(method = %call.method, inputs = len, "recorded input");
        Ok(())
    }

    async fn after(&self, call: &Call, output: &str) -> Result<()> {
        let len = self
            .store
            .rpush(&call.method.outputs_key(), output.as_bytes())
            .await?;
        debug!(method = %call.method, outputs = len, "recorded output");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::MethodKey;
    use crate::kv::MemoryStore;

    #[tokio::test]
    async fn test_records_inputs_and_outputs() {
        let store = Arc::new(MemoryStore::new());
        let history = CallHistory::new(store.clone());
        let call = Call::new(MethodKey::new("Cache", "store"), "('a',)");

        history.before(&call).await.unwrap();
        history.after(&call, "key-1").await.unwrap();

        let inputs = store.lrange("Cache.store:inputs", 0, -1).await.unwrap();
        let outputs = store.lrange("Cache.store:outputs", 0, -1).await.unwrap();
        assert_eq!(inputs, vec![b"('a',)".to_vec()]);
        assert_eq!(outputs, vec![b"key-1".to_vec()]);
    }
}
