//! In-memory document store, used for seeded local runs and tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::traits::DocumentStore;
use crate::store::types::{AccessPolicy, Document, Fields};

/// Thread-safe in-memory store.
///
/// Clones and views share the same data. A view created with
/// [`MemoryStore::public_view`] enforces an [`AccessPolicy`], the way the
/// hosted database applies its security rules to anonymous visitors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
    policy: Option<Arc<AccessPolicy>>,
}

impl MemoryStore {
    /// Create an empty store with unrestricted access
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the same data that applies `policy` to every call
    pub fn public_view(&self, policy: AccessPolicy) -> Self {
        Self {
            collections: Arc::clone(&self.collections),
            policy: Some(Arc::new(policy)),
        }
    }

    /// Insert or replace a document keeping its id. Bypasses the policy.
    pub async fn put(&self, collection: &str, document: Document) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }
    }

    /// Load a JSON array of documents (each with an `"id"`) into a
    /// collection. Returns the number of documents loaded. Nothing is
    /// loaded if any entry is malformed.
    pub async fn load_seed_file(&self, collection: &str, path: &Path) -> StoreResult<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to read {}: {e}", path.display())))?;
        let values: Vec<Value> = serde_json::from_str(&raw)?;
        let documents = values
            .into_iter()
            .map(Document::from_value)
            .collect::<StoreResult<Vec<_>>>()?;

        let loaded = documents.len();
        for document in documents {
            self.put(collection, document).await;
        }

        info!("💾 Loaded {} documents into {} from {}", loaded, collection, path.display());
        Ok(loaded)
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Drop every collection
    pub async fn clear(&self) {
        self.collections.write().await.clear();
    }

    fn policy(&self) -> Option<&AccessPolicy> {
        self.policy.as_deref()
    }

    fn not_found(collection: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        if let Some(policy) = self.policy() {
            policy.check_query(collection, field, value)?;
        }
        debug!("memory query {} where {} == {}", collection, field, value);

        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.field(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        if let Some(policy) = self.policy() {
            policy.check_read_all(collection)?;
        }
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn fetch_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        let found = collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned();

        if let (Some(policy), Some(document)) = (self.policy(), &found) {
            policy.check_document(collection, document)?;
        }
        Ok(found)
    }

    async fn insert(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        if let Some(policy) = self.policy() {
            policy.check_create(collection, &fields)?;
        }
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        debug!("memory insert {}/{}", collection, id);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        if let Some(policy) = self.policy() {
            policy.check_write(collection)?;
        }
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        document.merge(fields);
        Ok(())
    }

    async fn update_if_unmodified(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: DateTime<Utc>,
        fields: Fields,
    ) -> StoreResult<()> {
        if let Some(policy) = self.policy() {
            policy.check_write(collection)?;
        }
        // Compare and merge under one write lock
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        if document.timestamp(field) != Some(expected) {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        document.merge(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        if let Some(policy) = self.policy() {
            policy.check_write(collection)?;
        }
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::to_fields;
    use serde_json::json;
    use std::io::Write;

    fn fields(value: Value) -> Fields {
        to_fields(&value).unwrap()
    }

    #[tokio::test]
    async fn test_insert_fetch_and_order() {
        let store = MemoryStore::new();
        let a = store.insert("listings", fields(json!({"n": 1}))).await.unwrap();
        let b = store.insert("listings", fields(json!({"n": 2}))).await.unwrap();
        assert_ne!(a, b);

        let all = store.fetch_all("listings").await.unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);

        let doc = store.fetch_by_id("listings", &b).await.unwrap().unwrap();
        assert_eq!(doc.field("n"), Some(&json!(2)));
        assert!(store.fetch_by_id("listings", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_update_and_delete() {
        let store = MemoryStore::new();
        let id = store
            .insert("listings", fields(json!({"adminStatus": "active"})))
            .await
            .unwrap();
        store
            .insert("listings", fields(json!({"adminStatus": "hidden"})))
            .await
            .unwrap();

        let active = store
            .query_eq("listings", "adminStatus", &json!("active"))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);

        store
            .update("listings", &id, fields(json!({"adminStatus": "sold"})))
            .await
            .unwrap();
        assert!(store
            .query_eq("listings", "adminStatus", &json!("active"))
            .await
            .unwrap()
            .is_empty());

        store.delete("listings", &id).await.unwrap();
        assert_eq!(store.len("listings").await, 1);

        let missing = store.update("listings", &id, Fields::new()).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_if_unmodified_detects_concurrent_change() {
        let store = MemoryStore::new();
        let id = store
            .insert("listings", fields(json!({"updatedAt": "2025-01-01T10:00:00.000Z"})))
            .await
            .unwrap();
        let t1 = DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        store
            .update_if_unmodified(
                "listings",
                &id,
                "updatedAt",
                t1,
                fields(json!({"updatedAt": "2025-01-01T11:00:00Z"})),
            )
            .await
            .unwrap();
        let stale = store
            .update_if_unmodified(
                "listings",
                &id,
                "updatedAt",
                t1,
                fields(json!({"updatedAt": "2025-01-01T12:00:00Z"})),
            )
            .await;
        assert!(matches!(stale, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_public_view_enforces_policy_on_shared_data() {
        let admin = MemoryStore::new();
        let hidden = admin
            .insert("listings", fields(json!({"adminStatus": "hidden"})))
            .await
            .unwrap();
        let public = admin.public_view(AccessPolicy::public_site());

        assert!(matches!(
            public.fetch_all("listings").await,
            Err(StoreError::PermissionDenied(_))
        ));
        assert!(public
            .query_eq("listings", "adminStatus", &json!("active"))
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            public.fetch_by_id("listings", &hidden).await,
            Err(StoreError::PermissionDenied(_))
        ));
        assert!(matches!(
            public.insert("listings", Fields::new()).await,
            Err(StoreError::PermissionDenied(_))
        ));
        assert!(public.insert("enquiries", Fields::new()).await.is_ok());
        assert_eq!(admin.len("enquiries").await, 1);
    }

    #[tokio::test]
    async fn test_load_seed_file_keeps_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "seed-1", "area": "Baner"}}, {{"id": "seed-2", "area": "Wakad"}}]"#
        )
        .unwrap();

        let store = MemoryStore::new();
        let loaded = store.load_seed_file("listings", file.path()).await.unwrap();
        assert_eq!(loaded, 2);
        let doc = store.fetch_by_id("listings", "seed-2").await.unwrap().unwrap();
        assert_eq!(doc.field("area"), Some(&json!("Wakad")));
    }

    #[tokio::test]
    async fn test_malformed_seed_entry_loads_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "seed-1", "area": "Baner"}}, {{"area": "no id"}}, {{"id": "seed-3"}}]"#
        )
        .unwrap();

        let store = MemoryStore::new();
        let result = store.load_seed_file("listings", file.path()).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
        assert_eq!(store.len("listings").await, 0);
    }
}
