//! Site-wide contact settings.

use serde::{Deserialize, Serialize};

use safar_core::Email;

use super::validation::{Validate, ValidationError, http_url};

/// Contact details shown in the site header, footer and contact page.
///
/// Stored as a singleton; missing fields fall back to [`ContactInfo::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub social_links: SocialLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            phone: "+1 (555) 123-4567".to_string(),
            whatsapp: "+1 (555) 123-4567".to_string(),
            email: "info@safartravel.com".to_string(),
            address: "123 Pilgrimage Way, Suite 100".to_string(),
            social_links: SocialLinks::default(),
        }
    }
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            facebook: "https://facebook.com/safartravel".to_string(),
            instagram: "https://instagram.com/safartravel".to_string(),
            twitter: "https://twitter.com/safartravel".to_string(),
        }
    }
}

/// Partial contact update. Only provided fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinksPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinksPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

fn optional_link(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    // Blank clears the link
    match value {
        Some(v) if !v.trim().is_empty() => http_url(field, Some(v)),
        _ => Ok(()),
    }
}

impl Validate for ContactInfoPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;
        }
        if let Some(links) = &self.social_links {
            optional_link("socialLinks.facebook", links.facebook.as_deref())?;
            optional_link("socialLinks.instagram", links.instagram.as_deref())?;
            optional_link("socialLinks.twitter", links.twitter.as_deref())?;
        }
        Ok(())
    }
}
