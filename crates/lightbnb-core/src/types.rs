//! # Domain Types
//!
//! Row types shared by the builder, the repositories and the web front end.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │      User       │   │    Property     │   │   Reservation   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (SERIAL)    │◄──│  owner_id (FK)  │◄──│  property_id    │        │
//! │  │  name           │   │  title, city    │   │  start_date     │        │
//! │  │  email (unique) │   │  cost_per_night │   │  end_date       │        │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘        │
//! │                                 │                                       │
//! │                        ┌────────▼────────┐                              │
//! │                        │ PropertyListing │  Property + average_rating   │
//! │                        └─────────────────┘  (search result row)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! All ids are PostgreSQL `SERIAL` integers, so they map to `i32`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Users
// =============================================================================

/// A registered user (guest or owner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored password (hashed by the web layer before insert).
    pub password: String,
}

/// Fields needed to register a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Properties
// =============================================================================

/// A property listing as stored in the `properties` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly rate in cents.
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

impl Property {
    /// Returns the nightly rate as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(i64::from(self.cost_per_night))
    }
}

/// Fields needed to create a property.
///
/// `cost_per_night` is in cents, the same unit the table stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    #[serde(default)]
    pub parking_spaces: i32,
    #[serde(default)]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A search result row: the property plus its average review rating.
///
/// `average_rating` is `None` for listings nobody has reviewed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PropertyListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub property: Property,
    pub average_rating: Option<f64>,
}

// =============================================================================
// Reservations
// =============================================================================

/// A guest's reservation joined with the property it is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Reservation {
    pub reservation_id: i32,
    pub property_id: i32,
    pub title: String,
    pub thumbnail_photo_url: String,
    pub cost_per_night: i32,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub average_rating: Option<f64>,
}

impl Reservation {
    /// Nightly rate of the reserved property.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(i64::from(self.cost_per_night))
    }

    /// Number of nights booked.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Total cost of the stay.
    pub fn total_cost(&self) -> Money {
        self.cost().for_nights(self.nights())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_property() -> Property {
        Property {
            id: 1,
            owner_id: 7,
            title: "Speed lamp".to_string(),
            description: None,
            thumbnail_photo_url: "https://example.com/thumb.jpg".to_string(),
            cover_photo_url: "https://example.com/cover.jpg".to_string(),
            cost_per_night: 93061,
            parking_spaces: 6,
            number_of_bathrooms: 4,
            number_of_bedrooms: 8,
            country: "Canada".to_string(),
            street: "536 Namsub Highway".to_string(),
            city: "Sotboske".to_string(),
            province: "Quebec".to_string(),
            post_code: "28142".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_property_cost() {
        assert_eq!(sample_property().cost().to_string(), "$930.61");
    }

    #[test]
    fn test_listing_serializes_flat() {
        let listing = PropertyListing {
            property: sample_property(),
            average_rating: None,
        };
        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["city"], "Sotboske");
        assert!(json["average_rating"].is_null());
        assert!(json.get("property").is_none());
    }

    #[test]
    fn test_new_property_defaults() {
        let json = r#"{
            "owner_id": 1,
            "title": "Cabin",
            "thumbnail_photo_url": "t",
            "cover_photo_url": "c",
            "cost_per_night": 10000,
            "country": "Canada",
            "street": "1 Lake Rd",
            "city": "Banff",
            "province": "Alberta",
            "post_code": "T1L"
        }"#;
        let property: NewProperty = serde_json::from_str(json).unwrap();

        assert!(property.active);
        assert_eq!(property.parking_spaces, 0);
        assert_eq!(property.description, None);
    }

    #[test]
    fn test_reservation_nights_and_total() {
        let reservation = Reservation {
            reservation_id: 3,
            property_id: 1,
            title: "Speed lamp".to_string(),
            thumbnail_photo_url: "t".to_string(),
            cost_per_night: 12500,
            start_date: NaiveDate::from_ymd_opt(2018, 9, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2018, 9, 14).unwrap(),
            average_rating: Some(4.0),
        };

        assert_eq!(reservation.nights(), 3);
        assert_eq!(reservation.cost().to_string(), "$125.00");
        assert_eq!(reservation.total_cost().cents(), 37500);
    }
}
