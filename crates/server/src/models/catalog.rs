//! Catalog records: packages, hotels and flights.
//!
//! The three collections share one lifecycle (list active, get by id,
//! create, merge update, soft delete), expressed through [`CatalogItem`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use safar_core::CurrencyCode;

use super::validation::{
    Validate, ValidationError, http_url, in_range, non_negative, rating, require_text,
};

/// A record type stored in one of the catalog collections.
pub trait CatalogItem: Validate + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Store collection name.
    const COLLECTION: &'static str;
    /// Human-readable singular name, used in error messages.
    const LABEL: &'static str;

    /// Partial update payload.
    type Patch: Validate + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Set the soft-delete flag.
    fn set_active(&mut self, active: bool);
}

const fn default_active() -> bool {
    true
}

// =============================================================================
// Package
// =============================================================================

/// A pilgrimage package (e.g. a 14-day Umrah tour).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Free text, e.g. "14 days".
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Fields an admin may change on a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Validate for Package {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        non_negative("price", self.price)?;
        rating(self.rating)?;
        http_url("imageUrl", self.image_url.as_deref())
    }
}

impl Validate for PackagePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(price) = self.price {
            non_negative("price", price)?;
        }
        rating(self.rating)?;
        http_url("imageUrl", self.image_url.as_deref())
    }
}

impl CatalogItem for Package {
    const COLLECTION: &'static str = "packages";
    const LABEL: &'static str = "Package";

    type Patch = PackagePatch;

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

// =============================================================================
// Hotel
// =============================================================================

/// A partner hotel near the holy sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub price_per_night: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
    /// Free text, e.g. "300 m".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_haram: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Fields an admin may change on a hotel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_haram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Validate for Hotel {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        non_negative("pricePerNight", self.price_per_night)?;
        in_range("stars", self.stars, 1, 5)?;
        rating(self.rating)?;
        http_url("imageUrl", self.image_url.as_deref())
    }
}

impl Validate for HotelPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(price) = self.price_per_night {
            non_negative("pricePerNight", price)?;
        }
        in_range("stars", self.stars, 1, 5)?;
        rating(self.rating)?;
        http_url("imageUrl", self.image_url.as_deref())
    }
}

impl CatalogItem for Hotel {
    const COLLECTION: &'static str = "hotels";
    const LABEL: &'static str = "Hotel";

    type Patch = HotelPatch;

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

// =============================================================================
// Flight
// =============================================================================

/// A flight offer (typically a return trip to Jeddah or Madinah).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub departure_city: String,
    #[serde(default)]
    pub arrival_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Fields an admin may change on a flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

fn date_order(
    departure: Option<NaiveDate>,
    ret: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (departure, ret) {
        (Some(d), Some(r)) if r < d => Err(ValidationError::ReturnBeforeDeparture),
        _ => Ok(()),
    }
}

impl Validate for Flight {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        non_negative("price", self.price)?;
        date_order(self.departure_date, self.return_date)?;
        rating(self.rating)?;
        http_url("imageUrl", self.image_url.as_deref())
    }
}

impl Validate for FlightPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(price) = self.price {
            non_negative("price", price)?;
        }
        date_order(self.departure_date, self.return_date)?;
        rating(self.rating)?;
        http_url("imageUrl", self.image_url.as_deref())
    }
}

impl CatalogItem for Flight {
    const COLLECTION: &'static str = "flights";
    const LABEL: &'static str = "Flight";

    type Patch = FlightPatch;

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_package_defaults() {
        let package: Package =
            serde_json::from_value(json!({"name": "Umrah Economy", "price": 1200})).unwrap();
        assert!(package.active);
        assert_eq!(package.currency, CurrencyCode::USD);
        assert!(package.features.is_empty());
        assert!(package.validate().is_ok());
    }

    #[test]
    fn test_package_rejects_blank_name_and_negative_price() {
        let mut package: Package =
            serde_json::from_value(json!({"name": " ", "price": 10})).unwrap();
        assert_eq!(
            package.validate(),
            Err(ValidationError::Required { field: "name" })
        );

        package.name = "Hajj Premium".to_string();
        package.price = Decimal::new(-1, 0);
        assert_eq!(
            package.validate(),
            Err(ValidationError::Negative { field: "price" })
        );
    }

    #[test]
    fn test_hotel_star_range() {
        let hotel: Hotel = serde_json::from_value(json!({
            "name": "Dar Al Tawhid",
            "pricePerNight": "350.00",
            "stars": 6
        }))
        .unwrap();
        assert!(matches!(
            hotel.validate(),
            Err(ValidationError::OutOfRange { field: "stars", .. })
        ));
    }

    #[test]
    fn test_flight_dates_must_be_ordered() {
        let flight: Flight = serde_json::from_value(json!({
            "name": "LHR - JED",
            "price": 640,
            "departureDate": "2026-03-10",
            "returnDate": "2026-03-01"
        }))
        .unwrap();
        assert_eq!(
            flight.validate(),
            Err(ValidationError::ReturnBeforeDeparture)
        );
    }

    #[test]
    fn test_patch_serializes_only_provided_fields() {
        let patch: PackagePatch = serde_json::from_value(json!({"price": 999})).unwrap();
        assert!(patch.validate().is_ok());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"price": "999"}));
    }

    #[test]
    fn test_patch_validates_provided_fields() {
        let patch = HotelPatch {
            name: Some(String::new()),
            ..HotelPatch::default()
        };
        assert!(patch.validate().is_err());

        let patch = FlightPatch {
            image_url: Some("not a url".to_string()),
            ..FlightPatch::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }
}
