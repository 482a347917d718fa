//! Domain models for the site API.

pub mod admin_email;
pub mod catalog;
pub mod contact_info;
pub mod inquiry;
pub mod session;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use safar_core::DocumentId;

pub use admin_email::{AdminEmailEntry, AdminEmailRequest};
pub use catalog::{CatalogItem, Flight, FlightPatch, Hotel, HotelPatch, Package, PackagePatch};
pub use contact_info::{ContactInfo, ContactInfoPatch, SocialLinks, SocialLinksPatch};
pub use inquiry::{Inquiry, InquiryPatch, NewInquiry};
pub use session::Principal;
pub use validation::{Validate, ValidationError};

/// A stored record with its id and store-assigned timestamps.
///
/// Serializes flat: `{ "id": ..., <fields of T>, "createdAt": ..., "updatedAt": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: DocumentId,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
