//! Core types for Safar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError, normalize_email};
pub use id::{DocumentId, DocumentIdError};
pub use price::{CurrencyCode, Price};
pub use status::InquiryStatus;
