//! In-process document collection
//!
//! Understands the small filter/update vocabulary the school helpers emit:
//! field equality (with array membership, as MongoDB does for array fields)
//! and `$set` updates. Anything else is rejected instead of silently
//! matching the wrong documents.

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::collection::{DocumentCollection, UpdateSummary};
use crate::types::{Result, StowageError};

/// Vec-backed collection preserving insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

/// Does `document` satisfy every clause of `filter`?
fn filter_matches(document: &Document, filter: &Document) -> Result<bool> {
    for (field, expected) in filter {
        if field.starts_with('$') {
            return Err(StowageError::Internal(format!(
                "unsupported filter operator: {}",
                field
            )));
        }
        if let Bson::Document(inner) = expected {
            if inner.keys().any(|k| k.starts_with('$')) {
                return Err(StowageError::Internal(format!(
                    "unsupported filter operator on field '{}'",
                    field
                )));
            }
        }

        let hit = match document.get(field) {
            Some(Bson::Array(items)) => {
                items.contains(expected) || matches!(expected, Bson::Array(a) if a == items)
            }
            Some(actual) => actual == expected,
            None => false,
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Apply a `$set` update in place, returning whether anything changed
fn apply_update(document: &mut Document, update: &Document) -> Result<bool> {
    let mut changed = false;
    for (op, fields) in update {
        let fields = match (op.as_str(), fields) {
            ("$set", Bson::Document(fields)) => fields,
            _ => {
                return Err(StowageError::Internal(format!(
                    "unsupported update operator: {}",
                    op
                )))
            }
        };
        for (field, value) in fields {
            if document.get(field) != Some(value) {
                document.insert(field.clone(), value.clone());
                changed = true;
            }
        }
    }
    Ok(changed)
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, filter: Document) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut found = Vec::new();
        for document in documents.iter() {
            if filter_matches(document, &filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    async fn update_many(&self, filter: Document, update: Document) -> Result<UpdateSummary> {
        let mut documents = self.documents.write().await;
        let mut summary = UpdateSummary::default();
        for document in documents.iter_mut() {
            if filter_matches(document, &filter)? {
                summary.matched += 1;
                if apply_update(document, &update)? {
                    summary.modified += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn insert_one(&self, document: Document) -> Result<Bson> {
        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => Bson::ObjectId(ObjectId::new()),
        };

        let mut stored = Document::new();
        stored.insert("_id", id.clone());
        for (field, value) in document {
            if field != "_id" {
                stored.insert(field, value);
            }
        }

        self.documents.write().await.push(stored);
        Ok(id)
    }
}
