//! Backend-level semantics of the in-memory store.

use doclink_store::{Direction, FilterOp, MemoryStore, QueryConstraint, StoreBackend};
use serde_json::{json, Map, Value};

fn fields(value: Value) -> Map<String, Value> {
    let Value::Object(map) = value else {
        panic!("fields must be an object")
    };
    map
}

#[tokio::test]
async fn sentinel_resolves_to_millis() {
    let store = MemoryStore::new();
    let mut doc = fields(json!({ "title": "x" }));
    doc.insert("createdAt".to_string(), store.server_timestamp());

    store.set_doc("notes", "n1", doc).await.unwrap();

    let stored = store.get_doc("notes", "n1").await.unwrap().unwrap();
    let created_at = stored.fields.get("createdAt").unwrap();
    assert!(created_at.is_i64());
    assert!(created_at.as_i64().unwrap() > 1_600_000_000_000);
}

#[tokio::test]
async fn timestamps_are_strictly_monotonic() {
    let store = MemoryStore::new();

    let mut stamps = Vec::new();
    for i in 0..5 {
        let mut doc = fields(json!({}));
        doc.insert("updatedAt".to_string(), store.server_timestamp());
        store.set_doc("notes", &format!("n{i}"), doc).await.unwrap();

        let stored = store.get_doc("notes", &format!("n{i}")).await.unwrap().unwrap();
        stamps.push(stored.fields["updatedAt"].as_i64().unwrap());
    }

    for pair in stamps.windows(2) {
        assert!(pair[1] > pair[0], "stamps not strictly increasing: {stamps:?}");
    }
}

#[tokio::test]
async fn where_operators_filter() {
    let store = MemoryStore::new();
    for (id, score) in [("a", 1), ("b", 5), ("c", 9)] {
        store
            .set_doc("scores", id, fields(json!({ "score": score })))
            .await
            .unwrap();
    }

    let ge = store
        .run_query(
            "scores",
            &[QueryConstraint::where_field("score", FilterOp::Ge, json!(5))],
        )
        .await
        .unwrap();
    assert_eq!(ge.len(), 2);

    let ne = store
        .run_query(
            "scores",
            &[QueryConstraint::where_field("score", FilterOp::Ne, json!(5))],
        )
        .await
        .unwrap();
    assert_eq!(ne.len(), 2);

    // Missing field never matches.
    let missing = store
        .run_query(
            "scores",
            &[QueryConstraint::where_field("rank", FilterOp::Eq, json!(1))],
        )
        .await
        .unwrap();
    assert!(missing.is_empty());
}

#[tokio::test]
async fn limit_applies_after_preceding_constraints() {
    let store = MemoryStore::new();
    for (id, score) in [("a", 1), ("b", 5), ("c", 9)] {
        store
            .set_doc("scores", id, fields(json!({ "score": score })))
            .await
            .unwrap();
    }

    let top = store
        .run_query(
            "scores",
            &[
                QueryConstraint::order_by("score", Direction::Descending),
                QueryConstraint::limit(2),
            ],
        )
        .await
        .unwrap();

    let scores: Vec<_> = top
        .iter()
        .map(|d| d.fields["score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![9, 5]);
}

#[tokio::test]
async fn query_on_unknown_collection_is_empty() {
    let store = MemoryStore::new();
    let docs = store.run_query("nothing", &[]).await.unwrap();
    assert!(docs.is_empty());
}
