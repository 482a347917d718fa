//! Payload validation shared by the catalog, inquiry and contact models.

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

/// A payload field failed validation.
///
/// Messages name the camelCase wire field so they can be shown as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u8,
        max: u8,
    },

    #[error("{field} must be an absolute http(s) URL")]
    InvalidUrl { field: &'static str },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("returnDate must not be before departureDate")]
    ReturnBeforeDeparture,
}

/// Implemented by every payload accepted from a client.
pub trait Validate {
    /// Check the payload, reporting the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

pub(crate) fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

pub(crate) fn rating(value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(r) if !(0.0..=5.0).contains(&r) => Err(ValidationError::OutOfRange {
            field: "rating",
            min: 0,
            max: 5,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn in_range(
    field: &'static str,
    value: Option<u8>,
    min: u8,
    max: u8,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => {
            Err(ValidationError::OutOfRange { field, min, max })
        }
        _ => Ok(()),
    }
}

pub(crate) fn http_url(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(raw) = value else {
        return Ok(());
    };
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_trims() {
        assert!(require_text("name", "Umrah").is_ok());
        assert_eq!(
            require_text("name", "   "),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn test_rating_bounds() {
        assert!(rating(None).is_ok());
        assert!(rating(Some(0.0)).is_ok());
        assert!(rating(Some(4.5)).is_ok());
        assert!(rating(Some(5.1)).is_err());
        assert!(rating(Some(-0.1)).is_err());
        assert!(rating(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(http_url("imageUrl", Some("https://cdn.example.com/a.jpg")).is_ok());
        assert!(http_url("imageUrl", None).is_ok());
        assert!(http_url("imageUrl", Some("/images/a.jpg")).is_err());
        assert!(http_url("imageUrl", Some("ftp://example.com/a.jpg")).is_err());
    }

    #[test]
    fn test_messages_name_the_field() {
        let err = ValidationError::OutOfRange {
            field: "stars",
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "stars must be between 1 and 5");
    }
}
