//! Key-value store layer
//!
//! The cache and its call instrumentation need six primitive operations,
//! each assumed atomic on the store side. Multi-step sequences built on
//! them (increment, then push, then push) are *not* transactional.

pub mod memory;
pub mod redis;

use async_trait::async_trait;

use crate::types::Result;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Redis-shaped key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Raw value under `key`, or `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Increment the integer at `key` by one and return the new value.
    /// A missing key counts as zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Append `value` to the list at `key`, returning the new length
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// Inclusive range of the list at `key`; negative indices count from
    /// the end, so `(0, -1)` is the whole list
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Erase every key in the current namespace
    async fn flushdb(&self) -> Result<()>;
}
