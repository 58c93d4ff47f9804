//! Keyed storage cache
//!
//! Generic scalar storage over any [`KeyValueStore`](crate::kv::KeyValueStore).

pub mod keys;
pub mod store;
pub mod value;

pub use keys::MethodKey;
pub use store::{
    decode_float, decode_int, decode_str, Cache, CacheOptions, Instrumentation, STORE_METHOD,
};
pub use value::{args_literal, StoredValue};
