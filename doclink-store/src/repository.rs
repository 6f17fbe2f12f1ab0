//! Generic typed repository over one collection path.

use crate::backend::{BatchWrite, QueryConstraint, StoreBackend, WriteBatch};
use crate::error::StoreError;
use doclink_types::{
    Document, ErrorObject, OpResult, Severity, CREATED_AT_FIELD, UPDATED_AT_FIELD,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Success payload of a confirmed delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub message: String,
}

/// Typed CRUD + batch-write facade over one collection path.
///
/// Generic over the payload shape `T` and bound at construction to one
/// collection path and one backend. Every operation is a single attempt:
/// recognizable store errors pass through with their own code and message,
/// anything else becomes the unknown error with this repository's default
/// message. Nothing is ever panicked or re-thrown past this boundary.
pub struct Repository<T> {
    path: String,
    backend: Arc<dyn StoreBackend>,
    default_error_message: String,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Binds a repository to one collection path.
    pub fn new(
        path: impl Into<String>,
        backend: Arc<dyn StoreBackend>,
        default_error_message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            backend,
            default_error_message: default_error_message.into(),
            _payload: PhantomData,
        }
    }

    /// Collection path this repository is bound to.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn map_error(&self, err: StoreError) -> ErrorObject {
        match err {
            StoreError::Provider {
                code,
                name,
                message,
            } => ErrorObject::provider(code, name, message, Severity::Error),
            other => {
                debug!("Store call failed without provider detail: {}", other);
                ErrorObject::unknown("Unknown", &self.default_error_message, Severity::Error)
            }
        }
    }

    fn typed(&self, id: String, fields: Map<String, Value>) -> OpResult<Document<T>> {
        Document::from_fields(id, fields)
            .map_err(|_| ErrorObject::unknown("Unknown", &self.default_error_message, Severity::Error))
    }

    /// Fetches the documents matching the constraints, applied in the
    /// order given. Ordering and filtering semantics belong to the store.
    pub async fn get_all(&self, constraints: &[QueryConstraint]) -> OpResult<Vec<Document<T>>> {
        let raw = self
            .backend
            .run_query(&self.path, constraints)
            .await
            .map_err(|e| self.map_error(e))?;

        raw.into_iter()
            .map(|doc| self.typed(doc.id, doc.fields))
            .collect()
    }

    /// Fetches one document.
    ///
    /// An absent document is a valid outcome, returned as the fixed
    /// not-found error (severity `info`) so callers can tell it apart from
    /// a transport failure.
    pub async fn get_one(&self, id: &str) -> OpResult<Document<T>> {
        let raw = self
            .backend
            .get_doc(&self.path, id)
            .await
            .map_err(|e| self.map_error(e))?;

        match raw {
            Some(doc) => self.typed(doc.id, doc.fields),
            None => Err(ErrorObject::not_found()),
        }
    }

    /// Writes a document at `id` and returns the stored result via read-back.
    ///
    /// The store assigns `createdAt` and `updatedAt`. Any existing document
    /// at `id` is overwritten without an existence check — callers needing
    /// create-only semantics must check first.
    pub async fn create_one(&self, payload: &T, id: &str) -> OpResult<Document<T>> {
        let mut fields = self.serialize_payload(payload)?;
        fields.insert(CREATED_AT_FIELD.to_string(), self.backend.server_timestamp());
        fields.insert(UPDATED_AT_FIELD.to_string(), self.backend.server_timestamp());

        self.backend
            .set_doc(&self.path, id, fields)
            .await
            .map_err(|e| self.map_error(e))?;

        self.get_one(id).await
    }

    /// Merges a partial payload into the existing document, stamps a fresh
    /// `updatedAt`, and returns the stored result via read-back.
    pub async fn update_one(
        &self,
        partial: Map<String, Value>,
        id: &str,
    ) -> OpResult<Document<T>> {
        let mut fields = partial;
        fields.insert(UPDATED_AT_FIELD.to_string(), self.backend.server_timestamp());

        self.backend
            .update_doc(&self.path, id, fields)
            .await
            .map_err(|e| self.map_error(e))?;

        self.get_one(id).await
    }

    /// Deletes one document and returns a receipt once the store confirms.
    pub async fn delete_one(&self, id: &str) -> OpResult<DeleteReceipt> {
        self.backend
            .delete_doc(&self.path, id)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(DeleteReceipt {
            message: "Document Successfully Deleted".to_string(),
        })
    }

    /// Starts an empty write batch.
    ///
    /// Stage updates with [`Repository::batch_commit_update`] — possibly
    /// across several repositories sharing a backend — then commit the
    /// whole group atomically with [`Repository::commit_batch`].
    #[must_use]
    pub fn create_batch(&self) -> WriteBatch {
        WriteBatch::new()
    }

    /// Stages one merge update (with a fresh `updatedAt`) onto the batch
    /// without committing it.
    pub fn batch_commit_update(
        &self,
        batch: &mut WriteBatch,
        partial: Map<String, Value>,
        id: &str,
    ) {
        let mut fields = partial;
        fields.insert(UPDATED_AT_FIELD.to_string(), self.backend.server_timestamp());
        batch.stage(BatchWrite {
            path: self.path.clone(),
            id: id.to_string(),
            fields,
        });
    }

    /// Commits a batch atomically through the backend.
    pub async fn commit_batch(&self, batch: WriteBatch) -> OpResult<()> {
        self.backend
            .commit(batch)
            .await
            .map_err(|e| self.map_error(e))
    }

    fn serialize_payload(&self, payload: &T) -> OpResult<Map<String, Value>> {
        match serde_json::to_value(payload) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(ErrorObject::unknown(
                "Unknown",
                "Document Payloads Must Serialize to an Object",
                Severity::Error,
            )),
            Err(_) => Err(ErrorObject::unknown(
                "Unknown",
                &self.default_error_message,
                Severity::Error,
            )),
        }
    }
}
