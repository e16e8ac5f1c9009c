//! Document store backed by a JSON-over-HTTP collection API.
//!
//! Endpoints, relative to the base URL:
//! - `GET    {collection}`                         all documents
//! - `GET    {collection}?where=F&equals=JSON`     equality query
//! - `GET    {collection}/{id}`                    one document, 404 when missing
//! - `POST   {collection}`                         insert, answers `{"id": ...}`
//! - `PATCH  {collection}/{id}`                    shallow merge
//! - `DELETE {collection}/{id}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::traits::DocumentStore;
use crate::store::types::{Document, Fields};

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsertResponse {
    id: String,
}

impl RestStore {
    /// Create a client for `base_url`. With an API key every request is sent
    /// as the logged-in operator; without one the backend treats the caller
    /// as an anonymous visitor.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("property-desk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Backend(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, collection: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, collection, id),
            None => format!("{}/{}", self.base_url, collection),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        collection: &str,
        id: Option<&str>,
    ) -> StoreResult<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} {} returned status: {}", collection, id.unwrap_or(""), status);
        Err(status_error(status, collection, id, body))
    }

    async fn documents(response: Response) -> StoreResult<Vec<Document>> {
        let values: Vec<Value> = response.json().await.map_err(transport_error)?;
        values.into_iter().map(Document::from_value).collect()
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        StoreError::Serialization(err.to_string())
    } else {
        StoreError::Network(err.to_string())
    }
}

fn status_error(status: StatusCode, collection: &str, id: Option<&str>, body: String) -> StoreError {
    let id = id.unwrap_or_default().to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::PermissionDenied(format!("{collection}: {status}"))
        }
        StatusCode::NOT_FOUND => StoreError::NotFound {
            collection: collection.to_string(),
            id,
        },
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => StoreError::Conflict {
            collection: collection.to_string(),
            id,
        },
        _ => StoreError::Backend(format!("{collection}: {status} {body}")),
    }
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Document>> {
        let url = self.url(collection, None);
        debug!("Fetching URL: {} where {} == {}", url, field, value);
        let builder = self
            .request(Method::GET, &url)
            .query(&[("where", field.to_string()), ("equals", value.to_string())]);
        let response = self.send(builder, collection, None).await?;
        Self::documents(response).await
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let url = self.url(collection, None);
        debug!("Fetching URL: {}", url);
        let response = self
            .send(self.request(Method::GET, &url), collection, None)
            .await?;
        Self::documents(response).await
    }

    async fn fetch_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let url = self.url(collection, Some(id));
        debug!("Fetching URL: {}", url);
        match self
            .send(self.request(Method::GET, &url), collection, Some(id))
            .await
        {
            Ok(response) => {
                let value: Value = response.json().await.map_err(transport_error)?;
                Document::from_value(value).map(Some)
            }
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(other) => Err(other),
        }
    }

    async fn insert(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let url = self.url(collection, None);
        let builder = self.request(Method::POST, &url).json(&fields);
        let response = self.send(builder, collection, None).await?;
        let inserted: InsertResponse = response.json().await.map_err(transport_error)?;
        Ok(inserted.id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let url = self.url(collection, Some(id));
        let builder = self.request(Method::PATCH, &url).json(&fields);
        self.send(builder, collection, Some(id)).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let url = self.url(collection, Some(id));
        match self
            .send(self.request(Method::DELETE, &url), collection, Some(id))
            .await
        {
            Ok(_) | Err(StoreError::NotFound { .. }) => Ok(()),
            Err(other) => Err(other),
        }
    }

    fn backend_name(&self) -> &'static str {
        "rest"
    }
}
