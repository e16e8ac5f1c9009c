use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::store::types::{Document, Fields};

/// Common trait for all document stores.
/// Collections are addressed by name; documents are JSON objects with an
/// opaque id assigned on insert.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents whose `field` equals `value`, in insertion order
    async fn query_eq(&self, collection: &str, field: &str, value: &Value)
        -> StoreResult<Vec<Document>>;

    /// Every document of the collection, in insertion order
    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    async fn fetch_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Insert a new document and return its id
    async fn insert(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Shallow-merge `fields` into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Merge only if the timestamp in `field` is still the instant
    /// `expected`. Stored timestamps may use any RFC 3339 precision.
    async fn update_if_unmodified(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: DateTime<Utc>,
        fields: Fields,
    ) -> StoreResult<()> {
        let current = self
            .fetch_by_id(collection, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        if current.timestamp(field) != Some(expected) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Get the name of the storage backend
    fn backend_name(&self) -> &'static str;
}
