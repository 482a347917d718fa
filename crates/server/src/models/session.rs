//! Session-stored identity.
//!
//! Sessions are issued by the identity service; this crate only reads them
//! (tests and local tooling also write them).

use serde::{Deserialize, Serialize};

/// The authenticated caller as recorded in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `"admin"` grants admin rights directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Principal {
    /// A principal with only an email.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Set the role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Session keys.
pub mod keys {
    /// Key for the current principal.
    pub const PRINCIPAL: &str = "principal";
}
