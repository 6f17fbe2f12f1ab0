//! HTTP store backend.
//!
//! Talks to the remote document store over its REST surface:
//!
//! - `GET    {base}/v1/documents/{path}/{id}`
//! - `POST   {base}/v1/documents/{path}:query`
//! - `PUT    {base}/v1/documents/{path}/{id}`
//! - `PATCH  {base}/v1/documents/{path}/{id}`
//! - `DELETE {base}/v1/documents/{path}/{id}`
//! - `POST   {base}/v1/documents:commit`
//!
//! Timestamps arrive as RFC 3339 strings and are converted to epoch millis
//! before they reach the typed layer. Error bodies of the form
//! `{"error": {"status", "message"}}` pass through verbatim as provider
//! errors; anything else is a network error.

use crate::backend::{QueryConstraint, RawDocument, StoreBackend, WriteBatch};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use doclink_types::{CREATED_AT_FIELD, UPDATED_AT_FIELD};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration for the HTTP store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store's REST endpoint.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.doclink.dev".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Wire shape of one document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDocument {
    id: String,
    fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    documents: Vec<WireDocument>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    status: String,
    message: String,
}

/// HTTP [`StoreBackend`] implementation.
pub struct HttpStore {
    config: StoreConfig,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpStore {
    /// Creates a backend for the configured endpoint.
    pub fn new(config: StoreConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self {
            config,
            client,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets the bearer token attached to subsequent requests.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Clears the bearer token.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn doc_url(&self, path: &str, id: &str) -> String {
        format!("{}/v1/documents/{}/{}", self.config.api_base_url, path, id)
    }

    async fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = self.token.read().await.as_ref() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Converts a non-success response into the matching error.
    async fn into_store_error(response: Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => StoreError::Provider {
                code: parsed.error.status,
                name: "StoreError".to_string(),
                message: parsed.error.message,
            },
            Err(_) => StoreError::Network(format!("request failed with status {status}: {body}")),
        }
    }

    fn from_wire(wire: WireDocument) -> RawDocument {
        let mut fields = wire.fields;
        if let Some(millis) = wire.created_at.as_deref().and_then(parse_millis) {
            fields.insert(CREATED_AT_FIELD.to_string(), Value::from(millis));
        }
        if let Some(millis) = wire.updated_at.as_deref().and_then(parse_millis) {
            fields.insert(UPDATED_AT_FIELD.to_string(), Value::from(millis));
        }
        RawDocument {
            id: wire.id,
            fields,
        }
    }
}

fn parse_millis(rfc3339: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(rfc3339)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

#[async_trait]
impl StoreBackend for HttpStore {
    async fn get_doc(&self, path: &str, id: &str) -> StoreResult<Option<RawDocument>> {
        debug!("Fetching document: {}/{}", path, id);

        let response = self
            .request(Method::GET, self.doc_url(path, id))
            .await
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("get failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::into_store_error(response).await);
        }

        let wire: WireDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Network(format!("failed to parse document: {e}")))?;
        Ok(Some(Self::from_wire(wire)))
    }

    async fn run_query(
        &self,
        path: &str,
        constraints: &[QueryConstraint],
    ) -> StoreResult<Vec<RawDocument>> {
        debug!("Querying collection: {} ({} constraints)", path, constraints.len());

        let url = format!("{}/v1/documents/{}:query", self.config.api_base_url, path);
        let response = self
            .request(Method::POST, url)
            .await
            .json(&json!({ "constraints": constraints }))
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("query failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::into_store_error(response).await);
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Network(format!("failed to parse query result: {e}")))?;
        Ok(result.documents.into_iter().map(Self::from_wire).collect())
    }

    async fn set_doc(&self, path: &str, id: &str, fields: Map<String, Value>) -> StoreResult<()> {
        debug!("Writing document: {}/{}", path, id);

        let response = self
            .request(Method::PUT, self.doc_url(path, id))
            .await
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("set failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::into_store_error(response).await);
        }
        Ok(())
    }

    async fn update_doc(
        &self,
        path: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        debug!("Updating document: {}/{}", path, id);

        let response = self
            .request(Method::PATCH, self.doc_url(path, id))
            .await
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("update failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::into_store_error(response).await);
        }
        Ok(())
    }

    async fn delete_doc(&self, path: &str, id: &str) -> StoreResult<()> {
        debug!("Deleting document: {}/{}", path, id);

        let response = self
            .request(Method::DELETE, self.doc_url(path, id))
            .await
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("delete failed: {e}")))?;

        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(Self::into_store_error(response).await);
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        info!("Committing batch of {} writes", batch.len());

        let url = format!("{}/v1/documents:commit", self.config.api_base_url);
        let response = self
            .request(Method::POST, url)
            .await
            .json(&batch)
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("commit failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::into_store_error(response).await);
        }
        Ok(())
    }
}
