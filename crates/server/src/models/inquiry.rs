//! Customer inquiries from the public contact form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use safar_core::{Email, InquiryStatus};

use super::validation::{Validate, ValidationError, require_text};

/// Contact-form submission as sent by a visitor.
///
/// Has no `status` field; a client-sent status is dropped and the stored
/// inquiry always starts as pending.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
}

impl Validate for NewInquiry {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        Email::parse(&self.email).map_err(|_| ValidationError::InvalidEmail)?;
        require_text("message", &self.message)?;
        if self.travelers == Some(0) {
            return Err(ValidationError::Negative { field: "travelers" });
        }
        Ok(())
    }
}

impl NewInquiry {
    /// Build the stored inquiry, normalizing the email and forcing `Pending`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the submission is invalid.
    pub fn into_inquiry(self) -> Result<Inquiry, ValidationError> {
        self.validate()?;
        let email = Email::parse(&self.email).map_err(|_| ValidationError::InvalidEmail)?;

        Ok(Inquiry {
            name: self.name.trim().to_string(),
            email,
            phone: self.phone.filter(|p| !p.trim().is_empty()),
            message: self.message,
            package_id: self.package_id.filter(|p| !p.trim().is_empty()),
            travelers: self.travelers,
            preferred_date: self.preferred_date,
            status: InquiryStatus::Pending,
            notes: None,
        })
    }
}

/// A stored inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travelers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: InquiryStatus,
    /// Internal admin notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The fields an admin may change on an inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InquiryStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InquiryPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn submission() -> serde_json::Value {
        json!({
            "name": "Aisha Rahman",
            "email": "  Aisha@Example.COM ",
            "message": "Interested in the December Umrah package",
            "travelers": 4
        })
    }

    #[test]
    fn test_client_status_is_ignored() {
        let mut body = submission();
        body["status"] = json!("closed");

        let inquiry = serde_json::from_value::<NewInquiry>(body)
            .unwrap()
            .into_inquiry()
            .unwrap();
        assert_eq!(inquiry.status, InquiryStatus::Pending);
        assert_eq!(inquiry.email.as_str(), "aisha@example.com");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut body = submission();
        body["email"] = json!("not-an-email");

        let err = serde_json::from_value::<NewInquiry>(body)
            .unwrap()
            .into_inquiry()
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidEmail);
        assert_eq!(err.to_string(), "Invalid email address");
    }

    #[test]
    fn test_zero_travelers_rejected() {
        let mut body = submission();
        body["travelers"] = json!(0);
        let new: NewInquiry = serde_json::from_value(body).unwrap();
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_patch_rejects_unknown_status() {
        assert!(serde_json::from_value::<InquiryPatch>(json!({"status": "archived"})).is_err());

        let patch: InquiryPatch = serde_json::from_value(json!({"status": "contacted"})).unwrap();
        assert_eq!(patch.status, Some(InquiryStatus::Contacted));
        assert!(!patch.is_empty());
        assert!(InquiryPatch::default().is_empty());
    }
}
