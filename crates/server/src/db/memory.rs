//! In-memory backend for the document store.
//!
//! Used for local development (`SAFAR_STORE=memory`) and tests. Natural list
//! order is insertion order.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use safar_core::DocumentId;

use super::{Document, JsonMap, MergeMode, Query, RepositoryError, merge_json};

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<String, HashMap<DocumentId, Entry>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry {
    document: Document,
    /// Insertion sequence, used for natural order and timestamp ties.
    seq: u64,
}

impl MemoryState {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn collection(&mut self, name: &str) -> &mut HashMap<DocumentId, Entry> {
        self.collections.entry(name.to_owned()).or_default()
    }
}

/// Process-local document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    state: Arc<RwLock<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, every operation fails with
    /// `RepositoryError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    pub(super) async fn get(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, RepositoryError> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|entry| entry.document.clone()))
    }

    pub(super) async fn list(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Document>, RepositoryError> {
        self.check_available()?;
        let state = self.state.read().await;
        let Some(docs) = state.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<&Entry> = docs
            .values()
            .filter(|entry| query.matches(&entry.document.data))
            .collect();

        if query.is_newest_first() {
            entries.sort_by(|a, b| {
                b.document
                    .created_at
                    .cmp(&a.document.created_at)
                    .then(b.seq.cmp(&a.seq))
            });
        } else {
            entries.sort_by_key(|entry| entry.seq);
        }

        Ok(entries
            .into_iter()
            .map(|entry| entry.document.clone())
            .collect())
    }

    pub(super) async fn insert(
        &self,
        collection: &str,
        id: &DocumentId,
        data: JsonMap,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        let now = Utc::now();
        state.collection(collection).insert(
            id.clone(),
            Entry {
                document: Document {
                    id: id.clone(),
                    data,
                    created_at: now,
                    updated_at: now,
                },
                seq,
            },
        );
        Ok(())
    }

    pub(super) async fn set(
        &self,
        collection: &str,
        id: &DocumentId,
        data: JsonMap,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        let now = Utc::now();
        let docs = state.collection(collection);

        match docs.get_mut(id) {
            Some(entry) => {
                entry.document.data = data;
                entry.document.updated_at = now;
            }
            None => {
                docs.insert(
                    id.clone(),
                    Entry {
                        document: Document {
                            id: id.clone(),
                            data,
                            created_at: now,
                            updated_at: now,
                        },
                        seq,
                    },
                );
            }
        }
        Ok(())
    }

    pub(super) async fn merge(
        &self,
        collection: &str,
        id: &DocumentId,
        patch: JsonMap,
        mode: MergeMode,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let seq = state.next_seq();
        let now = Utc::now();
        let docs = state.collection(collection);

        if let Some(entry) = docs.get_mut(id) {
            merge_json(&mut entry.document.data, patch);
            entry.document.updated_at = now;
            return Ok(());
        }

        if mode == MergeMode::ExistingOnly {
            return Err(RepositoryError::NotFound);
        }

        let mut data = JsonMap::new();
        merge_json(&mut data, patch);
        docs.insert(
            id.clone(),
            Entry {
                document: Document {
                    id: id.clone(),
                    data,
                    created_at: now,
                    updated_at: now,
                },
                seq,
            },
        );
        Ok(())
    }

    pub(super) async fn delete(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut state = self.state.write().await;
        Ok(state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    pub(super) fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::super::DocumentStore;
    use super::*;

    fn map(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = DocumentStore::in_memory();
        let id = store
            .insert("packages", map(json!({"name": "Umrah Economy"})))
            .await
            .unwrap();

        let doc = store.get("packages", &id).await.unwrap().unwrap();
        assert_eq!(doc.data.get("name"), Some(&json!("Umrah Economy")));
        assert_eq!(doc.created_at, doc.updated_at);

        assert!(store.get("hotels", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_keeps_insertion_order() {
        let store = DocumentStore::in_memory();
        for (name, active) in [("a", true), ("b", false), ("c", true)] {
            store
                .insert("packages", map(json!({"name": name, "active": active})))
                .await
                .unwrap();
        }

        let names: Vec<Value> = store
            .list("packages", &Query::new().where_eq("active", true))
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.data["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("a"), json!("c")]);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = DocumentStore::in_memory();
        for n in 1..=3 {
            store
                .insert("inquiries", map(json!({"n": n})))
                .await
                .unwrap();
        }

        let order: Vec<Value> = store
            .list("inquiries", &Query::new().newest_first())
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.data["n"].clone())
            .collect();
        assert_eq!(order, vec![json!(3), json!(2), json!(1)]);
    }

    #[tokio::test]
    async fn test_merge_existing_only_requires_document() {
        let store = DocumentStore::in_memory();
        let id = DocumentId::parse("missing").unwrap();
        let result = store
            .merge("packages", &id, map(json!({"active": false})), MergeMode::ExistingOnly)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert!(store.get("packages", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_upsert_creates_then_merges() {
        let store = DocumentStore::in_memory();
        let id = DocumentId::parse("contact").unwrap();

        store
            .merge("settings", &id, map(json!({"phone": "1"})), MergeMode::Upsert)
            .await
            .unwrap();
        store
            .merge("settings", &id, map(json!({"email": "a@b.co"})), MergeMode::Upsert)
            .await
            .unwrap();

        let doc = store.get("settings", &id).await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.data), json!({"phone": "1", "email": "a@b.co"}));
    }

    #[tokio::test]
    async fn test_set_preserves_created_at() {
        let store = DocumentStore::in_memory();
        let id = DocumentId::parse("admin@example.com").unwrap();

        store
            .set("admin_emails", &id, map(json!({"createdBy": "x"})))
            .await
            .unwrap();
        let first = store.get("admin_emails", &id).await.unwrap().unwrap();

        store
            .set("admin_emails", &id, map(json!({"createdBy": "y"})))
            .await
            .unwrap();
        let second = store.get("admin_emails", &id).await.unwrap().unwrap();

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.data["createdBy"], json!("y"));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = DocumentStore::in_memory();
        let id = store.insert("admin_emails", JsonMap::new()).await.unwrap();
        assert!(store.delete("admin_emails", &id).await.unwrap());
        assert!(!store.delete("admin_emails", &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_operation() {
        let memory = MemoryDocumentStore::new();
        let store = DocumentStore::from(memory.clone());
        let id = DocumentId::parse("x").unwrap();

        memory.set_unavailable(true);
        assert!(matches!(
            store.get("packages", &id).await,
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(store.ping().await.is_err());

        memory.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
