//! Inquiry repository.

use safar_core::{DocumentId, InquiryStatus};

use super::{Document, DocumentStore, MergeMode, Query, RepositoryError, to_json_map};
use crate::models::{Inquiry, InquiryPatch, Record};

const COLLECTION: &str = "inquiries";

/// Repository for customer inquiries.
pub struct InquiryRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> InquiryRepository<'a> {
    /// Create a new inquiry repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Store a new inquiry. Its status is always `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, mut inquiry: Inquiry) -> Result<DocumentId, RepositoryError> {
        inquiry.status = InquiryStatus::Pending;
        inquiry.notes = None;
        let data = to_json_map(&inquiry)?;
        self.store.insert(COLLECTION, data).await
    }

    /// List inquiries, newest first, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if an inquiry is malformed.
    pub async fn list(
        &self,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<Record<Inquiry>>, RepositoryError> {
        let mut query = Query::new().newest_first();
        if let Some(status) = status {
            query = query.where_eq("status", status.as_str());
        }

        let docs = self.store.list(COLLECTION, &query).await?;
        docs.into_iter().map(Document::into_record).collect()
    }

    /// Get an inquiry by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the inquiry is malformed.
    pub async fn get(&self, id: &DocumentId) -> Result<Option<Record<Inquiry>>, RepositoryError> {
        self.store
            .get(COLLECTION, id)
            .await?
            .map(Document::into_record)
            .transpose()
    }

    /// Change the status and/or notes of an inquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no inquiry has this id.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: &DocumentId, patch: &InquiryPatch) -> Result<(), RepositoryError> {
        let patch = to_json_map(patch)?;
        self.store
            .merge(COLLECTION, id, patch, MergeMode::ExistingOnly)
            .await
    }
}
