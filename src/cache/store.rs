//! Keyed storage cache
//!
//! Stores scalars under freshly generated UUID keys and reads them back,
//! optionally decoded. `store` runs through the call instrumentation chain.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::keys::MethodKey;
use super::value::{args_literal, StoredValue};
use crate::instrument::counter::read_count;
use crate::instrument::{Call, CallCounter, CallHistory, CallInterceptor, InterceptorChain, Replay};
use crate::kv::KeyValueStore;
use crate::types::{Result, StowageError};

/// Qualified identity of [`Cache::store`]
pub const STORE_METHOD: &str = "Cache.store";

/// Which interceptors wrap `Cache::store`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrumentation {
    /// Count invocations (outermost)
    pub count_calls: bool,
    /// Record argument/result history
    pub record_history: bool,
}

impl Instrumentation {
    /// No interceptors at all
    pub fn none() -> Self {
        Self {
            count_calls: false,
            record_history: false,
        }
    }
}

impl Default for Instrumentation {
    fn default() -> Self {
        Self {
            count_calls: true,
            record_history: true,
        }
    }
}

/// Cache construction options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// Flush the whole key-value namespace on open. Destroys every key in
    /// the database, not just ones this cache wrote.
    pub reset_on_open: bool,
    pub instrumentation: Instrumentation,
}

/// Cache over a key-value store
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    chain: InterceptorChain,
    store_method: MethodKey,
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("chain", &self.chain)
            .field("store_method", &self.store_method)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Open a cache on `store`
    pub async fn open(store: Arc<dyn KeyValueStore>, options: CacheOptions) -> Result<Self> {
        if options.reset_on_open {
            warn!("reset_on_open set: flushing the entire key-value namespace");
            store.flushdb().await?;
        }

        let mut chain = InterceptorChain::new();
        if options.instrumentation.count_calls {
            chain.push(Arc::new(CallCounter::new(store.clone())));
        }
        if options.instrumentation.record_history {
            chain.push(Arc::new(CallHistory::new(store.clone())));
        }

        info!(interceptors = ?chain.names(), "cache opened");

        Ok(Self {
            store,
            chain,
            store_method: MethodKey::from(STORE_METHOD),
        })
    }

    /// Add an interceptor innermost in the `store` chain
    pub fn with_interceptor(mut self, interceptor: Arc<dyn CallInterceptor>) -> Self {
        self.chain.push(interceptor);
        self
    }

    /// Identity under which `store` calls are counted and recorded
    pub fn store_method(&self) -> &MethodKey {
        &self.store_method
    }

    /// Underlying key-value store
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Store `data` under a new random key and return the key
    pub async fn store(&self, data: impl Into<StoredValue>) -> Result<String> {
        let value = data.into();
        let call = Call::new(
            self.store_method.clone(),
            args_literal(std::slice::from_ref(&value)),
        );
        self.chain.run(&call, || self.write_fresh(value)).await
    }

    async fn write_fresh(&self, value: StoredValue) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &value.encode()).await?;
        debug!(key = %key, kind = value.kind(), "stored value");
        Ok(key)
    }

    /// Raw value at `key`, `None` if absent
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Value at `key` passed through `decode`; `None` if absent
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.store.get(key).await?.map(decode).transpose()
    }

    /// Value at `key` decoded as UTF-8 text
    pub async fn get_str(&self, key: &str) -> Result<String> {
        self.get_with(key, decode_str)
            .await?
            .ok_or_else(|| StowageError::MissingKey(key.to_string()))
    }

    /// Value at `key` decoded as a decimal integer
    pub async fn get_int(&self, key: &str) -> Result<i64> {
        self.get_with(key, decode_int)
            .await?
            .ok_or_else(|| StowageError::MissingKey(key.to_string()))
    }

    /// Value at `key` decoded as a float
    pub async fn get_float(&self, key: &str) -> Result<f64> {
        self.get_with(key, decode_float)
            .await?
            .ok_or_else(|| StowageError::MissingKey(key.to_string()))
    }

    /// Persisted invocation count for `method`
    pub async fn call_count(&self, method: &MethodKey) -> Result<u64> {
        read_count(self.store.as_ref(), method).await
    }

    /// Read back the recorded history of `method`
    pub async fn history(&self, method: &MethodKey) -> Result<Replay> {
        Replay::load(self.store.as_ref(), method).await
    }
}

/// Interpret raw bytes as UTF-8 text
pub fn decode_str(raw: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(raw)?)
}

/// Interpret raw bytes as a decimal integer
pub fn decode_int(raw: Vec<u8>) -> Result<i64> {
    let text = decode_str(raw)?;
    text.trim()
        .parse()
        .map_err(|_| StowageError::Decode(format!("not an integer: {:?}", text)))
}

/// Interpret raw bytes as a float
pub fn decode_float(raw: Vec<u8>) -> Result<f64> {
    let text = decode_str(raw)?;
    text.trim()
        .parse()
        .map_err(|_| StowageError::Decode(format!("not a float: {:?}", text)))
}
