//! School document helpers
//!
//! Each helper is a single filtered read or write against a collection of
//! school documents shaped like `{ name: String, topics: [String] }`.
//! Zero matches is never an error.

use bson::{doc, Bson, Document};
use tracing::debug;

use crate::db::collection::{DocumentCollection, UpdateSummary};
use crate::types::Result;

/// List every document in the collection.
///
/// An absent collection handle yields an empty list rather than an error.
pub async fn list_all<C>(collection: Option<&C>) -> Result<Vec<Document>>
where
    C: DocumentCollection + ?Sized,
{
    match collection {
        Some(collection) => collection.find(doc! {}).await,
        None => Ok(Vec::new()),
    }
}

/// Insert a school with exactly the given fields, returning its new id
pub async fn insert_school<C>(collection: &C, fields: Document) -> Result<Bson>
where
    C: DocumentCollection + ?Sized,
{
    let id = collection.insert_one(fields).await?;
    debug!(id = %id, "inserted school");
    Ok(id)
}

/// Replace the `topics` of every school named `name`
pub async fn update_topics<C, S>(collection: &C, name: &str, topics: &[S]) -> Result<UpdateSummary>
where
    C: DocumentCollection + ?Sized,
    S: AsRef<str>,
{
    let topics: Vec<String> = topics.iter().map(|t| t.as_ref().to_string()).collect();
    let summary = collection
        .update_many(doc! { "name": name }, doc! { "$set": { "topics": topics } })
        .await?;
    debug!(
        name,
        matched = summary.matched,
        modified = summary.modified,
        "updated school topics"
    );
    Ok(summary)
}

/// Every school whose `topics` list contains `topic`
pub async fn schools_by_topic<C>(collection: &C, topic: &str) -> Result<Vec<Document>>
where
    C: DocumentCollection + ?Sized,
{
    collection.find(doc! { "topics": topic }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryCollection;

    async fn seeded() -> MemoryCollection {
        let coll = MemoryCollection::new();
        for (name, topics) in [
            ("Holberton school", vec!["Algo", "C"]),
            ("UCSF", vec!["Algo", "MongoDB"]),
            ("UCLA", vec!["C", "Python"]),
        ] {
            insert_school(&coll, doc! { "name": name, "topics": topics })
                .await
                .unwrap();
        }
        coll
    }

    fn names(docs: &[Document]) -> Vec<String> {
        docs.iter()
            .map(|d| d.get_str("name").unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_list_all_empty_collection() {
        let coll = MemoryCollection::new();
        let docs = list_all(Some(&coll)).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_without_handle() {
        let docs = list_all::<MemoryCollection>(None).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_insert_preserves_fields() {
        let coll = MemoryCollection::new();
        let id = insert_school(
            &coll,
            doc! { "name": "UCSF", "address": "505 Parnassus Ave", "rank": 3 },
        )
        .await
        .unwrap();

        let docs = list_all(Some(&coll)).await.unwrap();
        assert_eq!(docs.len(), 1);
        let school = &docs[0];
        assert_eq!(school.get("_id"), Some(&id));
        assert_eq!(school.get_str("name").unwrap(), "UCSF");
        assert_eq!(school.get_str("address").unwrap(), "505 Parnassus Ave");
        assert_eq!(school.get_i32("rank").unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_topics_replaces_list() {
        let coll = seeded().await;
        let summary = update_topics(&coll, "Holberton school", &["Sys admin", "AI"])
            .await
            .unwrap();
        assert_eq!(summary.matched, 1);

        let docs = coll.find(doc! { "name": "Holberton school" }).await.unwrap();
        let topics: Vec<&str> = docs[0]
            .get_array("topics")
            .unwrap()
            .iter()
            .filter_map(|t| t.as_str())
            .collect();
        assert_eq!(topics, vec!["Sys admin", "AI"]);
    }

    #[tokio::test]
    async fn test_update_topics_no_match_is_ok() {
        let coll = seeded().await;
        let summary = update_topics(&coll, "Nowhere", &["x"]).await.unwrap();
        assert_eq!(summary, UpdateSummary::default());
    }

    #[tokio::test]
    async fn test_schools_by_topic() {
        let coll = seeded().await;

        let algo = schools_by_topic(&coll, "Algo").await.unwrap();
        assert_eq!(names(&algo), vec!["Holberton school", "UCSF"]);

        let python = schools_by_topic(&coll, "Python").await.unwrap();
        assert_eq!(names(&python), vec!["UCLA"]);

        let none = schools_by_topic(&coll, "COBOL").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_schools_by_topic_after_update() {
        let coll = seeded().await;
        update_topics(&coll, "UCLA", &["Rust"]).await.unwrap();

        assert!(names(&schools_by_topic(&coll, "Python").await.unwrap()).is_empty());
        assert_eq!(
            names(&schools_by_topic(&coll, "Rust").await.unwrap()),
            vec!["UCLA"]
        );
    }
}
