//! # mg-store-sqlite
//!
//! SQLite-backed implementation of `DocumentStore`. Every document is one
//! row: the collection name, the store-assigned id, and the schemaless JSON
//! body in a TEXT column, so the mapping stays faithful to the hosted
//! document store this replaces.

use async_trait::async_trait;
use chrono::Utc;
use mg_core::traits::{
    resolve_server_timestamps, Document, DocumentStore, OrderDirection, QueryOptions,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Opens (or creates) the database and ensures the documents table
    /// exists. A single connection is enough for this workload and keeps
    /// `sqlite::memory:` usable in tests.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT NOT NULL,
                id          TEXT PRIMARY KEY,
                data        TEXT NOT NULL,
                inserted_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)")
            .execute(&pool)
            .await?;
        log::info!("document store ready at {url}");
        Ok(Self { pool })
    }
}

/// Ordering fields are interpolated into the query, so only plain
/// identifiers are accepted.
fn safe_field(field: &str) -> anyhow::Result<&str> {
    if !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(field)
    } else {
        anyhow::bail!("invalid order field: {field:?}")
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn query(&self, collection: &str, options: QueryOptions) -> anyhow::Result<Vec<Document>> {
        let mut sql = String::from("SELECT id, data FROM documents WHERE collection = ?");
        if let Some((field, direction)) = &options.order_by {
            let field = safe_field(field)?;
            let keyword = match direction {
                OrderDirection::Ascending => "ASC",
                OrderDirection::Descending => "DESC",
            };
            sql.push_str(&format!(
                " ORDER BY json_extract(data, '$.{field}') {keyword}"
            ));
        }
        if let Some(limit) = options.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let rows = sqlx::query(&sql)
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Document {
                id: row.get("id"),
                data: serde_json::from_str(&row.get::<String, _>("data"))
                    .unwrap_or(Value::Null),
            })
            .collect())
    }

    async fn insert(&self, collection: &str, data: Value) -> anyhow::Result<String> {
        let mut data = data;
        let now = Utc::now();
        resolve_server_timestamps(&mut data, now);
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO documents (collection, id, data, inserted_at) VALUES (?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(&id)
        .bind(serde_json::to_string(&data)?)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}
