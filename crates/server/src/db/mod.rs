//! Document store access.
//!
//! All site content lives in a document store: named collections of JSON
//! documents addressed by string id, with store-assigned `created_at` /
//! `updated_at` timestamps.
//!
//! # Backends
//!
//! - [`postgres`] - `PostgreSQL` `documents` table (JSONB bodies)
//! - [`memory`] - process-local maps for local development and tests
//!
//! # Collections
//!
//! - `packages`, `hotels`, `flights` - catalog, soft-deleted via `active`
//! - `inquiries` - contact-form submissions
//! - `settings` - singletons (contact info under id `contact`)
//! - `admin_emails` - admin allowlist keyed by normalized email
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p safar-cli -- migrate
//! ```

pub mod admin_emails;
pub mod catalog;
pub mod contact_info;
pub mod inquiries;
pub mod memory;
pub mod postgres;

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use safar_core::DocumentId;

use crate::models::Record;

pub use admin_emails::AdminEmailRepository;
pub use catalog::CatalogRepository;
pub use contact_info::ContactInfoRepository;
pub use inquiries::InquiryRepository;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A JSON object body.
pub type JsonMap = serde_json::Map<String, Value>;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or does not match the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// A natural key cannot be used as a document id.
    #[error("invalid document id: {0}")]
    InvalidId(#[from] safar_core::DocumentIdError),

    /// The store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Id within its collection.
    pub id: DocumentId,
    /// Document body.
    pub data: JsonMap,
    /// Assigned by the store on first write.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every write.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Decode the body into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the body does not match `T`.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<Record<T>, RepositoryError> {
        let data = serde_json::from_value(Value::Object(self.data)).map_err(|e| {
            RepositoryError::DataCorruption(format!("document {}: {e}", self.id))
        })?;

        Ok(Record {
            id: self.id,
            data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A list query: top-level field equality filters plus an optional order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: JsonMap,
    newest_first: bool,
}

impl Query {
    /// A query matching every document in natural order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match documents whose top-level `field` equals `value`.
    #[must_use]
    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(field.to_owned(), value.into());
        self
    }

    /// Order by creation time, newest first.
    #[must_use]
    pub const fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// The equality filters as a JSON object (used for containment queries).
    #[must_use]
    pub const fn filters(&self) -> &JsonMap {
        &self.filters
    }

    /// Whether results are ordered newest first.
    #[must_use]
    pub const fn is_newest_first(&self) -> bool {
        self.newest_first
    }

    /// Whether a document body satisfies every filter.
    #[must_use]
    pub fn matches(&self, data: &JsonMap) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| data.get(field) == Some(expected))
    }
}

/// How [`DocumentStore::merge`] treats a missing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Create the document from the patch.
    Upsert,
    /// Fail with `RepositoryError::NotFound`.
    ExistingOnly,
}

/// Deep-merge `patch` into `target`.
///
/// Nested objects merge key by key; any other value (including arrays and
/// `null`) replaces what was there.
pub fn merge_json(target: &mut JsonMap, patch: JsonMap) {
    for (key, value) in patch {
        if let Value::Object(incoming) = value {
            if let Some(Value::Object(existing)) = target.get_mut(&key) {
                merge_json(existing, incoming);
                continue;
            }
            target.insert(key, Value::Object(incoming));
        } else {
            target.insert(key, value);
        }
    }
}

/// Serialize a value that must be a JSON object.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if `value` does not serialize to
/// an object.
pub fn to_json_map<T: serde::Serialize>(value: &T) -> Result<JsonMap, RepositoryError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RepositoryError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(RepositoryError::DataCorruption(e.to_string())),
    }
}

/// Handle to the document store.
///
/// Cheap to clone; both backends share their underlying pool or map.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    Postgres(PgDocumentStore),
    Memory(MemoryDocumentStore),
}

impl DocumentStore {
    /// A store backed by the `documents` table.
    #[must_use]
    pub const fn postgres(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres(PgDocumentStore::new(pool)),
        }
    }

    /// A fresh, empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from(MemoryDocumentStore::new())
    }

    /// Fetch one document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, RepositoryError> {
        match &self.backend {
            Backend::Postgres(store) => store.get(collection, id).await,
            Backend::Memory(store) => store.get(collection, id).await,
        }
    }

    /// List documents matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn list(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Document>, RepositoryError> {
        match &self.backend {
            Backend::Postgres(store) => store.list(collection, query).await,
            Backend::Memory(store) => store.list(collection, query).await,
        }
    }

    /// Insert a new document under a generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn insert(
        &self,
        collection: &str,
        data: JsonMap,
    ) -> Result<DocumentId, RepositoryError> {
        let id = DocumentId::generate();
        match &self.backend {
            Backend::Postgres(store) => store.insert(collection, &id, data).await?,
            Backend::Memory(store) => store.insert(collection, &id, data).await?,
        }
        Ok(id)
    }

    /// Create or replace a document body. `created_at` survives replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set(
        &self,
        collection: &str,
        id: &DocumentId,
        data: JsonMap,
    ) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Postgres(store) => store.set(collection, id, data).await,
            Backend::Memory(store) => store.set(collection, id, data).await,
        }
    }

    /// Deep-merge `patch` into a document and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the document is absent and
    /// `mode` is [`MergeMode::ExistingOnly`], or an error if the write fails.
    pub async fn merge(
        &self,
        collection: &str,
        id: &DocumentId,
        patch: JsonMap,
        mode: MergeMode,
    ) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Postgres(store) => store.merge(collection, id, patch, mode).await,
            Backend::Memory(store) => store.merge(collection, id, patch, mode).await,
        }
    }

    /// Physically delete a document. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, RepositoryError> {
        match &self.backend {
            Backend::Postgres(store) => store.delete(collection, id).await,
            Backend::Memory(store) => store.delete(collection, id).await,
        }
    }

    /// Check that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the store does not respond.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Postgres(store) => store.ping().await,
            Backend::Memory(store) => store.ping(),
        }
    }
}

impl From<MemoryDocumentStore> for DocumentStore {
    fn from(store: MemoryDocumentStore) -> Self {
        Self {
            backend: Backend::Memory(store),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_merge_json_preserves_untouched_fields() {
        let mut target = map(json!({"phone": "1", "email": "a@b.co", "address": "Makkah"}));
        merge_json(&mut target, map(json!({"phone": "2"})));
        assert_eq!(
            Value::Object(target),
            json!({"phone": "2", "email": "a@b.co", "address": "Makkah"})
        );
    }

    #[test]
    fn test_merge_json_merges_nested_objects() {
        let mut target = map(json!({
            "socialLinks": {"facebook": "fb", "instagram": "ig", "twitter": "tw"}
        }));
        merge_json(&mut target, map(json!({"socialLinks": {"facebook": "fb2"}})));
        assert_eq!(
            Value::Object(target),
            json!({"socialLinks": {"facebook": "fb2", "instagram": "ig", "twitter": "tw"}})
        );
    }

    #[test]
    fn test_merge_json_replaces_arrays_and_scalars_with_objects() {
        let mut target = map(json!({"features": ["a", "b"], "meta": "x"}));
        merge_json(&mut target, map(json!({"features": ["c"], "meta": {"k": 1}})));
        assert_eq!(
            Value::Object(target),
            json!({"features": ["c"], "meta": {"k": 1}})
        );
    }

    #[test]
    fn test_query_matches() {
        let query = Query::new().where_eq("active", true).where_eq("kind", "umrah");
        assert!(query.matches(&map(json!({"active": true, "kind": "umrah", "x": 1}))));
        assert!(!query.matches(&map(json!({"active": false, "kind": "umrah"}))));
        assert!(!query.matches(&map(json!({"kind": "umrah"}))));
        assert!(Query::new().matches(&JsonMap::new()));
    }

    #[test]
    fn test_to_json_map_rejects_non_objects() {
        assert!(to_json_map(&json!({"a": 1})).is_ok());
        assert!(matches!(
            to_json_map(&json!([1, 2])),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_into_record_reports_corruption() {
        #[derive(Debug, serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let doc = Document {
            id: DocumentId::parse("d1").unwrap(),
            data: map(json!({"name": 7})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            doc.into_record::<Named>(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
