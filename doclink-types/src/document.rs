//! Typed documents and their store-managed metadata.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field holding the creation timestamp, set once by the store.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Reserved field holding the last-write timestamp, refreshed on every write.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// An application-defined record plus the metadata the store manages for it.
///
/// `created_at` is set once at creation and never mutated; `updated_at` is
/// refreshed on every create and update. Both are milliseconds since the
/// Unix epoch and are owned by the remote store — this layer only reads
/// them back, it never fabricates or caches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub data: T,
}

impl<T: DeserializeOwned> Document<T> {
    /// Builds a typed document from a raw store row.
    ///
    /// The reserved timestamp fields are split out of the field map; the
    /// remainder deserializes into `T`.
    pub fn from_fields(
        id: impl Into<String>,
        mut fields: Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let created_at = take_millis(&mut fields, CREATED_AT_FIELD);
        let updated_at = take_millis(&mut fields, UPDATED_AT_FIELD);
        let data = serde_json::from_value(Value::Object(fields))?;
        Ok(Self {
            id: id.into(),
            created_at,
            updated_at,
            data,
        })
    }
}

fn take_millis(fields: &mut Map<String, Value>, key: &str) -> Option<i64> {
    fields.remove(key).and_then(|v| v.as_i64())
}
