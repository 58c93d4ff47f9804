//! In-process key-value store
//!
//! Mirrors the Redis semantics the cache depends on, including
//! WRONGTYPE failures when a string key is used as a list or vice versa.
//! Each operation holds the shard lock for its key, so single operations
//! are atomic just like on a real server.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::KeyValueStore;
use crate::types::{Result, StowageError};

#[derive(Debug, Clone)]
enum Entry {
    Value(Vec<u8>),
    List(Vec<Vec<u8>>),
}

fn wrong_type(key: &str) -> StowageError {
    StowageError::KeyValue(format!(
        "WRONGTYPE Operation against a key holding the wrong kind of value: {}",
        key
    ))
}

/// DashMap-backed store, cheap to clone and share between tasks
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

/// Resolve a Redis-style inclusive `[start, stop]` range against `len`
fn list_window(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .insert(key.to_string(), Entry::Value(value.to_vec()));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.entries.get(key).as_deref() {
            Some(Entry::Value(raw)) => Ok(Some(raw.clone())),
            Some(Entry::List(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Value(b"0".to_vec()));

        match entry.value_mut() {
            Entry::Value(raw) => {
                let current: i64 = std::str::from_utf8(raw)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        StowageError::KeyValue(
                            "ERR value is not an integer or out of range".to_string(),
                        )
                    })?;
                let next = current.checked_add(1).ok_or_else(|| {
                    StowageError::KeyValue("ERR increment or decrement would overflow".to_string())
                })?;
                *raw = next.to_string().into_bytes();
                Ok(next)
            }
            Entry::List(_) => Err(wrong_type(key)),
        }
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));

        match entry.value_mut() {
            Entry::List(items) => {
                items.push(value.to_vec());
                Ok(items.len())
            }
            Entry::Value(_) => Err(wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        match self.entries.get(key).as_deref() {
            Some(Entry::List(items)) => Ok(match list_window(items.len(), start, stop) {
                Some((from, to)) => items[from..=to].to_vec(),
                None => Vec::new(),
            }),
            Some(Entry::Value(_)) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn flushdb(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}
