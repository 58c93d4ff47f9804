//! End-to-end tests against the in-process backends

use bson::doc;
use futures_util::future::join_all;
use std::sync::Arc;

use stowage::cache::{Cache, CacheOptions, MethodKey, StoredValue};
use stowage::db::{self, MemoryCollection};
use stowage::kv::{KeyValueStore, MemoryStore};
use stowage::StowageError;

async fn fresh_cache() -> Cache {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    Cache::open(
        store,
        CacheOptions {
            reset_on_open: true,
            ..CacheOptions::default()
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let cache = fresh_cache().await;

    let text_key = cache.store("Hello, Redis!").await.unwrap();
    assert_eq!(cache.get_str(&text_key).await.unwrap(), "Hello, Redis!");

    let int_key = cache.store(1234).await.unwrap();
    assert_eq!(cache.get_int(&int_key).await.unwrap(), 1234);

    let replay = stowage::replay(&cache, "Cache.store").await.unwrap();
    assert_eq!(replay.inputs, 2);
    assert_eq!(replay.calls.len(), 2);
    assert_eq!(replay.calls[0].args, "('Hello, Redis!',)");
    assert_eq!(replay.calls[0].output, text_key);
    assert_eq!(replay.calls[1].args, "(1234,)");
    assert_eq!(replay.calls[1].output, int_key);

    let expected = format!(
        "Cache.store was called 2 times:\n\
         Cache.store(*('Hello, Redis!',)) -> {}\n\
         Cache.store(*(1234,)) -> {}\n",
        text_key, int_key
    );
    assert_eq!(replay.to_string(), expected);
}

#[tokio::test]
async fn test_sequential_calls_stay_aligned() {
    let cache = fresh_cache().await;
    let values: Vec<StoredValue> = vec![
        "text".into(),
        b"\x01bytes".into(),
        42.into(),
        (-0.5).into(),
        "it's".into(),
    ];

    let mut keys = Vec::new();
    for value in &values {
        keys.push(cache.store(value.clone()).await.unwrap());
    }

    let method = MethodKey::from("Cache.store");
    assert_eq!(cache.call_count(&method).await.unwrap(), values.len() as u64);

    let history = cache.history(&method).await.unwrap();
    assert!(history.is_consistent());
    assert_eq!(history.calls.len(), values.len());
    for (i, call) in history.calls.iter().enumerate() {
        assert_eq!(call.output, keys[i]);
        assert_eq!(call.args, format!("({},)", values[i].literal()));
    }
}

#[tokio::test]
async fn test_scalar_round_trips() {
    let cache = fresh_cache().await;

    let key = cache.store(b"\x00\xffraw".to_vec()).await.unwrap();
    assert_eq!(cache.get(&key).await.unwrap(), Some(b"\x00\xffraw".to_vec()));

    let key = cache.store(-98765i64).await.unwrap();
    assert_eq!(cache.get_int(&key).await.unwrap(), -98765);

    let key = cache.store(0.1f64).await.unwrap();
    assert_eq!(cache.get_float(&key).await.unwrap(), 0.1);

    let key = cache.store(String::from("ünïcödé")).await.unwrap();
    assert_eq!(cache.get_str(&key).await.unwrap(), "ünïcödé");
}

#[tokio::test]
async fn test_concurrent_calls_all_counted() {
    let cache = fresh_cache().await;

    let keys = join_all((0..20).map(|i| cache.store(i))).await;
    assert!(keys.iter().all(|k| k.is_ok()));

    let method = cache.store_method();
    assert_eq!(cache.call_count(method).await.unwrap(), 20);
    let history = cache.history(method).await.unwrap();
    assert_eq!(history.inputs, 20);
    assert_eq!(history.outputs, 20);
}

#[tokio::test]
async fn test_typed_reader_on_missing_key() {
    let cache = fresh_cache().await;
    assert_eq!(cache.get("absent").await.unwrap(), None);
    assert!(matches!(
        cache.get_str("absent").await,
        Err(StowageError::MissingKey(_))
    ));
}

#[tokio::test]
async fn test_school_helpers() {
    let coll = MemoryCollection::new();
    assert!(db::list_all(Some(&coll)).await.unwrap().is_empty());

    let id = db::insert_school(
        &coll,
        doc! { "name": "Holberton school", "address": "972 Mission street" },
    )
    .await
    .unwrap();
    db::insert_school(&coll, doc! { "name": "UCSF", "topics": ["Algo"] })
        .await
        .unwrap();

    db::update_topics(&coll, "Holberton school", &["Sys admin", "AI", "Algorithm"])
        .await
        .unwrap();

    let all = db::list_all(Some(&coll)).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(coll.len().await, 2);
    assert_eq!(all[0].get("_id"), Some(&id));
    assert_eq!(all[0].get_str("address").unwrap(), "972 Mission street");

    let ai = db::schools_by_topic(&coll, "AI").await.unwrap();
    assert_eq!(ai.len(), 1);
    assert_eq!(ai[0].get_str("name").unwrap(), "Holberton school");

    assert!(db::schools_by_topic(&coll, "Python").await.unwrap().is_empty());
}
