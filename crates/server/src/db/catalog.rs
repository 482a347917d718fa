//! Catalog repository for packages, hotels and flights.

use std::marker::PhantomData;

use serde_json::Value;

use safar_core::DocumentId;

use super::{
    Document, DocumentStore, JsonMap, MergeMode, Query, RepositoryError, merge_json, to_json_map,
};
use crate::models::{CatalogItem, Record};

/// Repository for one catalog collection, selected by `T`.
pub struct CatalogRepository<'a, T> {
    store: &'a DocumentStore,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: CatalogItem> CatalogRepository<'a, T> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            _item: PhantomData,
        }
    }

    /// List records whose `active` flag is set, in store order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a record is malformed.
    pub async fn list_active(&self) -> Result<Vec<Record<T>>, RepositoryError> {
        let docs = self
            .store
            .list(T::COLLECTION, &Query::new().where_eq("active", true))
            .await?;

        docs.into_iter().map(Document::into_record).collect()
    }

    /// Get a record by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the record is malformed.
    pub async fn get(&self, id: &DocumentId) -> Result<Option<Record<T>>, RepositoryError> {
        self.store
            .get(T::COLLECTION, id)
            .await?
            .map(Document::into_record)
            .transpose()
    }

    /// Create a record. It is always stored active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, mut item: T) -> Result<DocumentId, RepositoryError> {
        item.set_active(true);
        let data = to_json_map(&item)?;
        self.store.insert(T::COLLECTION, data).await
    }

    /// The record as it would read after `patch`, without writing it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this id.
    /// Returns `RepositoryError::DataCorruption` if the merged body does not match `T`.
    pub async fn merged(&self, id: &DocumentId, patch: &T::Patch) -> Result<T, RepositoryError> {
        let record = self.get(id).await?.ok_or(RepositoryError::NotFound)?;
        let mut data = to_json_map(&record.data)?;
        merge_json(&mut data, to_json_map(patch)?);
        serde_json::from_value(Value::Object(data))
            .map_err(|e| RepositoryError::DataCorruption(format!("document {id}: {e}")))
    }

    /// Merge the provided fields into an existing record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this id.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: &DocumentId, patch: &T::Patch) -> Result<(), RepositoryError> {
        let patch = to_json_map(patch)?;
        self.store
            .merge(T::COLLECTION, id, patch, MergeMode::ExistingOnly)
            .await
    }

    /// Mark a record inactive. The record stays retrievable by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record has this id.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn soft_delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        let mut patch = JsonMap::new();
        patch.insert("active".to_string(), Value::Bool(false));
        self.store
            .merge(T::COLLECTION, id, patch, MergeMode::ExistingOnly)
            .await
    }
}
