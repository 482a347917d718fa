//! Contact-info singleton.

use safar_core::DocumentId;

use super::{DocumentStore, MergeMode, RepositoryError, to_json_map};
use crate::models::{ContactInfo, ContactInfoPatch};

const COLLECTION: &str = "settings";
const CONTACT_ID: &str = "contact";

fn contact_id() -> Result<DocumentId, RepositoryError> {
    Ok(DocumentId::parse(CONTACT_ID)?)
}

/// Repository for the site contact settings.
pub struct ContactInfoRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> ContactInfoRepository<'a> {
    /// Create a new contact-info repository.
    #[must_use]
    pub const fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Current contact info, or the defaults if none has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored document is malformed.
    pub async fn get(&self) -> Result<ContactInfo, RepositoryError> {
        match self.store.get(COLLECTION, &contact_id()?).await? {
            Some(doc) => Ok(doc.into_record::<ContactInfo>()?.data),
            None => Ok(ContactInfo::default()),
        }
    }

    /// Merge the provided fields, creating the document if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn update(&self, patch: &ContactInfoPatch) -> Result<(), RepositoryError> {
        let patch = to_json_map(patch)?;
        self.store
            .merge(COLLECTION, &contact_id()?, patch, MergeMode::Upsert)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::SocialLinksPatch;

    #[tokio::test]
    async fn test_get_returns_default_when_absent() {
        let store = DocumentStore::in_memory();
        let info = ContactInfoRepository::new(&store).get().await.unwrap();
        assert_eq!(info, ContactInfo::default());
    }

    #[tokio::test]
    async fn test_partial_update_preserves_other_fields() {
        let store = DocumentStore::in_memory();
        let repo = ContactInfoRepository::new(&store);

        repo.update(&ContactInfoPatch {
            email: Some("hello@safar.example".to_string()),
            address: Some("King Fahd Road, Makkah".to_string()),
            ..ContactInfoPatch::default()
        })
        .await
        .unwrap();

        repo.update(&ContactInfoPatch {
            phone: Some("+966 12 555 0100".to_string()),
            ..ContactInfoPatch::default()
        })
        .await
        .unwrap();

        let info = repo.get().await.unwrap();
        assert_eq!(info.phone, "+966 12 555 0100");
        assert_eq!(info.email, "hello@safar.example");
        assert_eq!(info.address, "King Fahd Road, Makkah");
        assert_eq!(info.social_links, ContactInfo::default().social_links);
    }

    #[tokio::test]
    async fn test_nested_social_links_merge() {
        let store = DocumentStore::in_memory();
        let repo = ContactInfoRepository::new(&store);

        repo.update(&ContactInfoPatch {
            social_links: Some(SocialLinksPatch {
                facebook: Some("https://facebook.com/a".to_string()),
                instagram: Some("https://instagram.com/a".to_string()),
                twitter: Some("https://twitter.com/a".to_string()),
            }),
            ..ContactInfoPatch::default()
        })
        .await
        .unwrap();

        repo.update(&ContactInfoPatch {
            social_links: Some(SocialLinksPatch {
                facebook: Some("https://facebook.com/b".to_string()),
                ..SocialLinksPatch::default()
            }),
            ..ContactInfoPatch::default()
        })
        .await
        .unwrap();

        let links = repo.get().await.unwrap().social_links;
        assert_eq!(links.facebook, "https://facebook.com/b");
        assert_eq!(links.instagram, "https://instagram.com/a");
        assert_eq!(links.twitter, "https://twitter.com/a");
    }
}
