//! # mg-store-memory
//!
//! In-memory implementation of `DocumentStore`, used by the test suites and
//! the demo assembly. Collections live in a concurrent map; query ordering
//! is best-effort over the raw JSON field values, the same contract the
//! hosted store offers.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use mg_core::traits::{
    resolve_server_timestamps, Document, DocumentStore, OrderDirection, QueryOptions,
};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held by a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

fn field_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        // Documents without the field sort after those with it.
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => match (left.as_str(), right.as_str()) {
                (Some(x), Some(y)) => x.cmp(y),
                _ => left.to_string().cmp(&right.to_string()),
            },
        },
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(&self, collection: &str, options: QueryOptions) -> anyhow::Result<Vec<Document>> {
        let mut documents = self
            .collections
            .get(collection)
            .map(|docs| docs.clone())
            .unwrap_or_default();

        if let Some((field, direction)) = &options.order_by {
            documents.sort_by(|a, b| {
                let ordering = field_cmp(a.data.get(field), b.data.get(field));
                match direction {
                    OrderDirection::Ascending => ordering,
                    OrderDirection::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = options.limit {
            documents.truncate(limit);
        }
        Ok(documents)
    }

    async fn insert(&self, collection: &str, data: Value) -> anyhow::Result<String> {
        let mut data = data;
        resolve_server_timestamps(&mut data, Utc::now());
        let id = Uuid::new_v4().to_string();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                data,
            });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mg_core::traits::SERVER_TIMESTAMP;
    use serde_json::json;

    #[tokio::test]
    async fn insert_then_query_round_trip() {
        let store = MemoryDocumentStore::new();
        let id = store
            .insert("reviews", json!({"artist": "Lelo", "rating": 8}))
            .await
            .unwrap();
        let docs = store.query("reviews", QueryOptions::default()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].data["artist"], "Lelo");
    }

    #[tokio::test]
    async fn ordering_and_limit() {
        let store = MemoryDocumentStore::new();
        for (artist, date) in [("a", "2024-01-01"), ("b", "2024-03-01"), ("c", "2024-02-01")] {
            store
                .insert("interviews", json!({"artist": artist, "date": date}))
                .await
                .unwrap();
        }
        let docs = store
            .query(
                "interviews",
                QueryOptions {
                    order_by: Some(("date".into(), OrderDirection::Descending)),
                    limit: Some(2),
                },
            )
            .await
            .unwrap();
        let artists: Vec<&str> = docs
            .iter()
            .filter_map(|doc| doc.data["artist"].as_str())
            .collect();
        assert_eq!(artists, ["b", "c"]);
    }

    #[tokio::test]
    async fn server_timestamp_sentinel_is_resolved() {
        let store = MemoryDocumentStore::new();
        store
            .insert("fanrankings", json!({"userId": "u1", "createdAt": SERVER_TIMESTAMP}))
            .await
            .unwrap();
        let docs = store
            .query("fanrankings", QueryOptions::default())
            .await
            .unwrap();
        let created_at = docs[0].data["createdAt"].as_str().unwrap();
        assert_ne!(created_at, SERVER_TIMESTAMP);
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
    }

    #[tokio::test]
    async fn unknown_collection_is_empty_not_an_error() {
        let store = MemoryDocumentStore::new();
        let docs = store.query("nominations", QueryOptions::default()).await.unwrap();
        assert!(docs.is_empty());
    }
}
