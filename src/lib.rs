//! Stowage - small helpers over a document store and a key-value store
//!
//! ## Components
//!
//! - **db**: school document queries over MongoDB (`list_all`,
//!   `insert_school`, `update_topics`, `schools_by_topic`)
//! - **kv**: the key-value boundary, with Redis and in-process backends
//! - **cache**: scalar storage under generated UUID keys
//! - **instrument**: call counting, argument/result history and replay,
//!   composed as an explicit interceptor chain

pub mod cache;
pub mod config;
pub mod db;
pub mod instrument;
pub mod kv;
pub mod types;

pub use cache::{Cache, CacheOptions, Instrumentation, MethodKey, StoredValue};
pub use config::Args;
pub use instrument::{replay, Replay};
pub use types::{Result, StowageError};
