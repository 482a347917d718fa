//! Admin allowlist entries.

use serde::{Deserialize, Serialize};

use safar_core::Email;

/// Grants admin rights to one email address.
///
/// The document id is the normalized email, so an address can appear at most
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEmailEntry {
    pub email: Email,
    /// Normalized email of the admin who added the entry.
    pub created_by: String,
}

/// Body of `POST`/`DELETE /api/admin/seed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminEmailRequest {
    #[serde(default)]
    pub email: Option<String>,
}
