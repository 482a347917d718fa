//! Document identifiers.
//!
//! Every record in the document store is addressed by a collection name and
//! a string id. Generated ids are UUID v4 strings; keyed collections (such as
//! the admin allowlist) use a natural key like a normalized email instead.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing a [`DocumentId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentIdError {
    /// The id is empty after trimming.
    #[error("id cannot be empty")]
    Empty,
    /// The id is longer than the store accepts.
    #[error("id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The id contains a path separator.
    #[error("id cannot contain '/'")]
    InvalidCharacter,
}

/// A string document id.
///
/// ```
/// use safar_core::DocumentId;
///
/// let id = DocumentId::parse(" abc-123 ").unwrap();
/// assert_eq!(id.as_str(), "abc-123");
/// assert!(DocumentId::parse("").is_err());
/// assert!(DocumentId::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Maximum id length accepted by the store.
    pub const MAX_LENGTH: usize = 1500;

    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an id supplied by a client. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, too long, or contains `/`.
    pub fn parse(s: &str) -> Result<Self, DocumentIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DocumentIdError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(DocumentIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.contains('/') {
            return Err(DocumentIdError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocumentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_uuid() {
        let id = DocumentId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, DocumentId::generate());
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(DocumentId::parse("  x1 ").unwrap().as_str(), "x1");
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert_eq!(DocumentId::parse(" "), Err(DocumentIdError::Empty));
        assert_eq!(
            DocumentId::parse("packages/1"),
            Err(DocumentIdError::InvalidCharacter)
        );
        assert!(matches!(
            DocumentId::parse(&"a".repeat(1501)),
            Err(DocumentIdError::TooLong { .. })
        ));
    }
}
