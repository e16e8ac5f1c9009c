//! Store that fails every call with a fixed error, for exercising failure
//! paths.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::store::traits::DocumentStore;
use crate::store::types::{Document, Fields};

pub(crate) struct FailingStore {
    error: StoreError,
}

impl FailingStore {
    pub(crate) fn new(error: StoreError) -> Self {
        Self { error }
    }

    pub(crate) fn permission_denied() -> Self {
        Self::new(StoreError::PermissionDenied("missing or insufficient permissions".into()))
    }

    pub(crate) fn network() -> Self {
        Self::new(StoreError::Network("connection reset".into()))
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn query_eq(&self, _: &str, _: &str, _: &Value) -> StoreResult<Vec<Document>> {
        Err(self.error.clone())
    }

    async fn fetch_all(&self, _: &str) -> StoreResult<Vec<Document>> {
        Err(self.error.clone())
    }

    async fn fetch_by_id(&self, _: &str, _: &str) -> StoreResult<Option<Document>> {
        Err(self.error.clone())
    }

    async fn insert(&self, _: &str, _: Fields) -> StoreResult<String> {
        Err(self.error.clone())
    }

    async fn update(&self, _: &str, _: &str, _: Fields) -> StoreResult<()> {
        Err(self.error.clone())
    }

    async fn delete(&self, _: &str, _: &str) -> StoreResult<()> {
        Err(self.error.clone())
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
