//! MongoDB client and collection wrapper

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::db::collection::{DocumentCollection, UpdateSummary};
use crate::types::{Result, StowageError};

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the server answers a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| StowageError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StowageError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get an untyped document collection
    pub fn collection(&self, name: &str) -> MongoCollection {
        MongoCollection {
            inner: self.client.database(&self.db_name).collection::<Document>(name),
        }
    }

    /// Get the raw MongoDB client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Schema-free MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoCollection {
    inner: Collection<Document>,
}

impl MongoCollection {
    /// Wrap an existing driver collection
    pub fn from_collection(inner: Collection<Document>) -> Self {
        Self { inner }
    }

    /// Get the underlying collection for advanced operations
    pub fn inner(&self) -> &Collection<Document> {
        &self.inner
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, filter: Document) -> Result<Vec<Document>> {
        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| StowageError::Database(format!("Find failed: {}", e)))?;

        let results: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StowageError::Database(format!("Error reading document: {}", e)))?;

        debug!(
            collection = %self.inner.name(),
            count = results.len(),
            "find completed"
        );
        Ok(results)
    }

    async fn update_many(&self, filter: Document, update: Document) -> Result<UpdateSummary> {
        let result = self
            .inner
            .update_many(filter, update)
            .await
            .map_err(|e| StowageError::Database(format!("Update failed: {}", e)))?;

        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn insert_one(&self, document: Document) -> Result<Bson> {
        let result = self
            .inner
            .insert_one(document)
            .await
            .map_err(|e| StowageError::Database(format!("Insert failed: {}", e)))?;

        Ok(result.inserted_id)
    }
}
