//! In-process store backend.
//!
//! Same observable semantics as the remote store: server-resolved
//! timestamps, merge updates that fail on absent documents, atomic batch
//! commits, constraints applied in caller order. Used as the test double
//! for the repository and for local tooling.

use crate::backend::{
    Direction, FilterOp, QueryConstraint, RawDocument, StoreBackend, WriteBatch,
};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    /// path -> id -> fields. BTreeMap keeps unordered queries deterministic.
    collections: HashMap<String, BTreeMap<String, Map<String, Value>>>,
    /// Last issued timestamp, for strict monotonicity.
    last_millis: i64,
}

/// In-memory [`StoreBackend`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    /// Wall-clock millis, bumped by one when the clock has not advanced,
    /// so consecutive writes always get strictly increasing stamps.
    fn next_millis(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_millis = now.max(self.last_millis + 1);
        self.last_millis
    }

    /// Replaces timestamp sentinels with one resolved stamp per call.
    fn resolve_sentinels(&mut self, fields: &mut Map<String, Value>) {
        let sentinel = crate::backend::timestamp_sentinel();
        let stamp = self.next_millis();
        for value in fields.values_mut() {
            if *value == sentinel {
                *value = Value::from(stamp);
            }
        }
    }
}

fn missing(path: &str, id: &str) -> StoreError {
    StoreError::Provider {
        code: "NOT_FOUND".to_string(),
        name: "StoreError".to_string(),
        message: format!("no document at {path}/{id}"),
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64().partial_cmp(&y.as_f64()),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn matches(fields: &Map<String, Value>, field: &str, op: FilterOp, value: &Value) -> bool {
    let Some(actual) = fields.get(field) else {
        return false;
    };
    if op == FilterOp::Eq {
        return actual == value;
    }
    if op == FilterOp::Ne {
        return actual != value;
    }
    let Some(ordering) = compare(actual, value) else {
        return false;
    };
    match op {
        FilterOp::Lt => ordering == Ordering::Less,
        FilterOp::Le => ordering != Ordering::Greater,
        FilterOp::Gt => ordering == Ordering::Greater,
        FilterOp::Ge => ordering != Ordering::Less,
        FilterOp::Eq | FilterOp::Ne => unreachable!(),
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn get_doc(&self, path: &str, id: &str) -> StoreResult<Option<RawDocument>> {
        let state = self.state.lock().expect("store lock poisoned");
        Ok(state
            .collections
            .get(path)
            .and_then(|docs| docs.get(id))
            .map(|fields| RawDocument {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn run_query(
        &self,
        path: &str,
        constraints: &[QueryConstraint],
    ) -> StoreResult<Vec<RawDocument>> {
        let state = self.state.lock().expect("store lock poisoned");
        let mut docs: Vec<RawDocument> = state
            .collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| RawDocument {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        for constraint in constraints {
            match constraint {
                QueryConstraint::Where { field, op, value } => {
                    docs.retain(|doc| matches(&doc.fields, field, *op, value));
                }
                QueryConstraint::OrderBy { field, direction } => {
                    docs.sort_by(|a, b| {
                        let ordering = match (a.fields.get(field), b.fields.get(field)) {
                            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
                            (Some(_), None) => Ordering::Greater,
                            (None, Some(_)) => Ordering::Less,
                            (None, None) => Ordering::Equal,
                        };
                        match direction {
                            Direction::Ascending => ordering,
                            Direction::Descending => ordering.reverse(),
                        }
                    });
                }
                QueryConstraint::Limit { count } => {
                    docs.truncate(*count as usize);
                }
            }
        }

        Ok(docs)
    }

    async fn set_doc(&self, path: &str, id: &str, fields: Map<String, Value>) -> StoreResult<()> {
        let mut state = self.state.lock().expect("store lock poisoned");
        let mut fields = fields;
        state.resolve_sentinels(&mut fields);
        state
            .collections
            .entry(path.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update_doc(
        &self,
        path: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut state = self.state.lock().expect("store lock poisoned");
        let mut fields = fields;
        state.resolve_sentinels(&mut fields);

        let doc = state
            .collections
            .get_mut(path)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| missing(path, id))?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete_doc(&self, path: &str, id: &str) -> StoreResult<()> {
        let mut state = self.state.lock().expect("store lock poisoned");
        if let Some(docs) = state.collections.get_mut(path) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> StoreResult<()> {
        let mut state = self.state.lock().expect("store lock poisoned");

        // All-or-nothing: verify every target exists before applying any write.
        for write in &batch.writes {
            let exists = state
                .collections
                .get(&write.path)
                .is_some_and(|docs| docs.contains_key(&write.id));
            if !exists {
                return Err(missing(&write.path, &write.id));
            }
        }

        for write in batch.writes {
            let mut fields = write.fields;
            state.resolve_sentinels(&mut fields);
            let doc = state
                .collections
                .get_mut(&write.path)
                .and_then(|docs| docs.get_mut(&write.id))
                .expect("existence checked above");
            for (key, value) in fields {
                doc.insert(key, value);
            }
        }
        Ok(())
    }
}
