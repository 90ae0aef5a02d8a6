//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! The document store and the identity provider are external collaborators;
//! the core only ever sees these two contracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::AuthenticatedUser;

/// Sentinel value for a field the store replaces with its own write-time
/// timestamp. Mirrors the hosted store's server-timestamp marker.
pub const SERVER_TIMESTAMP: &str = "__SERVER_TIMESTAMP__";

/// Replaces every top-level [`SERVER_TIMESTAMP`] field with `now`, RFC 3339.
/// Store implementations call this at write time.
pub fn resolve_server_timestamps(data: &mut Value, now: chrono::DateTime<chrono::Utc>) {
    if let Value::Object(fields) = data {
        for value in fields.values_mut() {
            if value.as_str() == Some(SERVER_TIMESTAMP) {
                *value = Value::String(now.to_rfc3339());
            }
        }
    }
}

/// Collection names consumed by the site.
pub mod collections {
    pub const NOMINATIONS: &str = "nominations";
    pub const FAN_RANKINGS: &str = "fanrankings";
    pub const REVIEWS: &str = "reviews";
    pub const REVIEW_COMMENTS: &str = "musicreviewscomments";
    pub const INTERVIEWS: &str = "interviews";
    pub const TOP_ARTISTS: &str = "top5";
    pub const RANKED_TRACKS: &str = "ranking";
    pub const TRACK_COMMENTS: &str = "musictastecomments";
    pub const FEATURED: &str = "featured";
}

/// A raw document as returned by the store: an opaque, store-assigned
/// identifier plus a schemaless JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// Optional ordering and result-count limit for a collection query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub order_by: Option<(String, OrderDirection)>,
    pub limit: Option<usize>,
}

impl QueryOptions {
    pub fn ordered(field: &str, direction: OrderDirection) -> Self {
        Self {
            order_by: Some((field.to_string(), direction)),
            limit: None,
        }
    }

    pub fn limited(limit: usize) -> Self {
        Self {
            order_by: None,
            limit: Some(limit),
        }
    }
}

/// Persistence contract for the schemaless document store.
///
/// The core never updates or deletes existing documents; content entities
/// are administered out of band and submissions are insert-only.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a collection, best-effort ordered and limited per `options`.
    async fn query(&self, collection: &str, options: QueryOptions) -> anyhow::Result<Vec<Document>>;

    /// Inserts a document and returns the store-assigned identifier.
    /// Any field whose value equals [`SERVER_TIMESTAMP`] is replaced with
    /// the write-time timestamp before the document is persisted.
    async fn insert(&self, collection: &str, data: Value) -> anyhow::Result<String>;
}

/// Identity contract for the external OAuth provider.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Completes the interactive sign-in flow for an authorization code and
    /// returns the provider's user capsule.
    async fn sign_in(&self, authorization_code: &str) -> anyhow::Result<AuthenticatedUser>;

    /// Ends the provider session, if any.
    async fn sign_out(&self) -> anyhow::Result<()>;
}
