//! Admin allowlist repository.
//!
//! Entries are keyed by the normalized email, so allowing the same address
//! twice overwrites rather than duplicates.

use safar_core::{DocumentId, Email, normalize_email};

use super::{Document, DocumentStore, Query, RepositoryError, to_json_map};
use crate::models::{AdminEmailEntry, Record};
use crate::services::authz::AllowlistLookup;

const COLLECTION: &str = "admin_emails";

fn entry_id(email: &Email) -> Result<DocumentId, RepositoryError> {
    Ok(DocumentId::parse(email.as_str())?)
}

/// Repository for the admin allowlist.
#[derive(Clone, Copy)]
pub struct AdminEmailRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> AdminEmailRepository<'a> {
    /// Create a new allowlist repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Add or refresh an entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidId` if the email cannot be used as a key.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn allow(&self, email: &Email, created_by: &str) -> Result<(), RepositoryError> {
        let entry = AdminEmailEntry {
            email: email.clone(),
            created_by: normalize_email(created_by),
        };
        let data = to_json_map(&entry)?;
        self.store.set(COLLECTION, &entry_id(email)?, data).await
    }

    /// Remove an entry. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidId` if the email cannot be used as a key.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn revoke(&self, email: &Email) -> Result<bool, RepositoryError> {
        self.store.delete(COLLECTION, &entry_id(email)?).await
    }

    /// List all entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if an entry is malformed.
    pub async fn list(&self) -> Result<Vec<Record<AdminEmailEntry>>, RepositoryError> {
        let mut records = self
            .store
            .list(COLLECTION, &Query::new())
            .await?
            .into_iter()
            .map(Document::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    /// Whether an entry exists for `email` (normalized before lookup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(&self, email: &str) -> Result<bool, RepositoryError> {
        // An email that cannot be a key cannot have an entry
        let Ok(id) = DocumentId::parse(&normalize_email(email)) else {
            return Ok(false);
        };
        Ok(self.store.get(COLLECTION, &id).await?.is_some())
    }
}

impl AllowlistLookup for AdminEmailRepository<'_> {
    async fn is_allowlisted(&self, email: &str) -> Result<bool, RepositoryError> {
        self.contains(email).await
    }
}
