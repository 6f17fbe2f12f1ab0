//! Store backend abstraction.
//!
//! Defines the fixed operation set this layer needs from a remote,
//! collection/document organized store, plus the opaque query-constraint
//! and write-batch values that flow through it.

use crate::error::StoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Comparison operator for a `Where` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Sort direction for an `OrderBy` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// One composable query fragment.
///
/// Constraints are opaque to the repository: it forwards them to the
/// backend in caller order and the backend (or the remote store) applies
/// them in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QueryConstraint {
    Where {
        field: String,
        op: FilterOp,
        value: Value,
    },
    OrderBy {
        field: String,
        direction: Direction,
    },
    Limit {
        count: u32,
    },
}

impl QueryConstraint {
    pub fn where_field(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self::Where {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn order_by(field: impl Into<String>, direction: Direction) -> Self {
        Self::OrderBy {
            field: field.into(),
            direction,
        }
    }

    pub fn limit(count: u32) -> Self {
        Self::Limit { count }
    }
}

/// An untyped store row: document id plus its field map.
///
/// The reserved `createdAt`/`updatedAt` fields, when present, ride along in
/// `fields`; the typed layer splits them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// One staged write inside a batch. Always a merge-update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWrite {
    pub path: String,
    pub id: String,
    pub fields: Map<String, Value>,
}

/// An ordered group of writes committed atomically by the backend.
///
/// Opaque to callers: stage writes through the repository, then hand the
/// batch to [`crate::Repository::commit_batch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch {
    pub(crate) writes: Vec<BatchWrite>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub(crate) fn stage(&mut self, write: BatchWrite) {
        self.writes.push(write);
    }
}

/// The fixed operation set consumed from the remote store.
///
/// All operations are asynchronous, single-attempt and independent; the
/// backend imposes no ordering between concurrent calls. Last-write-wins
/// is inherited from the store's own update semantics.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Fetches one document, `None` if it does not exist.
    async fn get_doc(&self, path: &str, id: &str) -> StoreResult<Option<RawDocument>>;

    /// Runs a query against one collection, applying constraints in the
    /// order given.
    async fn run_query(
        &self,
        path: &str,
        constraints: &[QueryConstraint],
    ) -> StoreResult<Vec<RawDocument>>;

    /// Writes a full document, silently overwriting any existing one.
    async fn set_doc(&self, path: &str, id: &str, fields: Map<String, Value>) -> StoreResult<()>;

    /// Merges fields into an existing document; errors if it is absent.
    async fn update_doc(&self, path: &str, id: &str, fields: Map<String, Value>)
        -> StoreResult<()>;

    /// Deletes one document.
    async fn delete_doc(&self, path: &str, id: &str) -> StoreResult<()>;

    /// Commits a batch of staged writes atomically.
    async fn commit(&self, batch: WriteBatch) -> StoreResult<()>;

    /// Sentinel value the store resolves to its own timestamp at write time.
    fn server_timestamp(&self) -> Value {
        timestamp_sentinel()
    }
}

/// The wire sentinel backends recognize as "resolve to server time".
pub(crate) fn timestamp_sentinel() -> Value {
    json!({ ".sv": "timestamp" })
}
