//! Document collection boundary
//!
//! The helpers in [`crate::db::schools`] only need three operations from a
//! document store. Anything that can filter, bulk-update and insert
//! `bson::Document`s can stand behind this trait.

use async_trait::async_trait;
use bson::{Bson, Document};
use serde::Serialize;

use crate::types::Result;

/// Outcome of an `update_many` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    /// Documents that matched the filter
    pub matched: u64,
    /// Documents actually changed
    pub modified: u64,
}

/// A schema-free document collection
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Return every document matching `filter`, in store order.
    /// An empty filter matches all documents.
    async fn find(&self, filter: Document) -> Result<Vec<Document>>;

    /// Apply `update` to every document matching `filter`
    async fn update_many(&self, filter: Document, update: Document) -> Result<UpdateSummary>;

    /// Insert one document and return the identifier the store assigned
    async fn insert_one(&self, document: Document) -> Result<Bson>;
}
