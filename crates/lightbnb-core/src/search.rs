//! # Property Search
//!
//! Turns sparse search options into one parameterized query.
//!
//! ## Filter Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    build_property_search()                              │
//! │                                                                         │
//! │  properties LEFT JOIN property_reviews   (unreviewed listings kept)     │
//! │       │                                                                 │
//! │       ├── city?          WHERE/AND properties.city LIKE '%city%'        │
//! │       ├── owner_id?      WHERE/AND properties.owner_id = id             │
//! │       ├── min price?     WHERE/AND cost_per_night >= dollars × 100      │
//! │       ├── max price?     WHERE/AND cost_per_night <= dollars × 100      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GROUP BY properties.id                                                 │
//! │       ├── min rating?    HAVING avg(rating) >= rating                   │
//! │       ▼                                                                 │
//! │  ORDER BY cost_per_night                                                │
//! │  LIMIT limit             (always the last parameter)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Presence Rule
//! A filter applies only when its value is *set and non-empty*: `Some("")`,
//! `Some(0)` and `Some(0.0)` behave exactly like `None`. The web form sends
//! zero for "no preference", so a zero rating or price is never a bound.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::query::{CompareOp, ParameterizedQuery, SelectBuilder};

/// Default number of listings returned by a search.
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

const LISTING_SELECT: &str = "SELECT properties.*, avg(property_reviews.rating)::float8 AS average_rating
FROM properties
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

// =============================================================================
// Search Criteria
// =============================================================================

/// Optional search filters. Every field may be omitted.
///
/// ## Example
/// ```rust
/// use lightbnb_core::SearchCriteria;
///
/// let criteria = SearchCriteria::default()
///     .city("Vancouver")
///     .price_range(50, 200);
/// assert_eq!(criteria.active_filters(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SearchCriteria {
    /// Substring of the city name.
    #[serde(default)]
    pub city: Option<String>,

    /// Only listings owned by this user.
    #[serde(default)]
    pub owner_id: Option<i32>,

    /// Lower bound on the nightly rate, in whole dollars.
    #[serde(default)]
    pub minimum_price_per_night: Option<i32>,

    /// Upper bound on the nightly rate, in whole dollars.
    #[serde(default)]
    pub maximum_price_per_night: Option<i32>,

    /// Lower bound on the average review rating.
    #[serde(default)]
    pub minimum_rating: Option<f64>,
}

impl SearchCriteria {
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn owner(mut self, owner_id: i32) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets both price bounds (whole dollars).
    pub fn price_range(mut self, minimum: i32, maximum: i32) -> Self {
        self.minimum_price_per_night = Some(minimum);
        self.maximum_price_per_night = Some(maximum);
        self
    }

    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    fn present_city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }

    fn present_owner(&self) -> Option<i32> {
        self.owner_id.filter(|id| *id != 0)
    }

    fn present_minimum_price(&self) -> Option<Money> {
        present_price(self.minimum_price_per_night)
    }

    fn present_maximum_price(&self) -> Option<Money> {
        present_price(self.maximum_price_per_night)
    }

    fn present_minimum_rating(&self) -> Option<f64> {
        self.minimum_rating.filter(|r| *r != 0.0 && !r.is_nan())
    }

    /// Number of filters that will actually be applied.
    pub fn active_filters(&self) -> usize {
        [
            self.present_city().is_some(),
            self.present_owner().is_some(),
            self.present_minimum_price().is_some(),
            self.present_maximum_price().is_some(),
            self.present_minimum_rating().is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

fn present_price(dollars: Option<i32>) -> Option<Money> {
    dollars
        .filter(|d| *d != 0)
        .map(|d| Money::from_dollars(i64::from(d)))
}

// =============================================================================
// Result Limit
// =============================================================================

/// Maximum number of rows a query may return. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct ResultLimit(u32);

impl ResultLimit {
    /// ## Errors
    /// `CoreError::InvalidLimit` when `limit` is zero or negative.
    pub fn new(limit: i64) -> CoreResult<Self> {
        u32::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .map(ResultLimit)
            .ok_or(CoreError::InvalidLimit(limit))
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        ResultLimit(DEFAULT_RESULT_LIMIT)
    }
}

impl TryFrom<i64> for ResultLimit {
    type Error = CoreError;

    fn try_from(limit: i64) -> CoreResult<Self> {
        ResultLimit::new(limit)
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the property search query.
///
/// Pure: the same criteria and limit always produce the same
/// `(sql, params)`.
///
/// ## Example
/// ```rust
/// use lightbnb_core::{build_property_search, ResultLimit, SearchCriteria, SqlValue};
///
/// let criteria = SearchCriteria::default().city("Vancouver");
/// let query = build_property_search(&criteria, ResultLimit::default());
///
/// assert!(query.sql().contains("properties.city LIKE $1"));
/// assert_eq!(
///     query.params(),
///     &[SqlValue::Text("%Vancouver%".into()), SqlValue::Int(10)]
/// );
/// ```
pub fn build_property_search(criteria: &SearchCriteria, limit: ResultLimit) -> ParameterizedQuery {
    let mut builder = SelectBuilder::new(LISTING_SELECT);

    if let Some(city) = criteria.present_city() {
        builder = builder.and_where("properties.city", CompareOp::Like, format!("%{}%", city));
    }

    if let Some(owner_id) = criteria.present_owner() {
        builder = builder.and_where("properties.owner_id", CompareOp::Eq, owner_id);
    }

    if let Some(minimum) = criteria.present_minimum_price() {
        builder = builder.and_where("properties.cost_per_night", CompareOp::Gte, minimum.cents());
    }

    if let Some(maximum) = criteria.present_maximum_price() {
        builder = builder.and_where("properties.cost_per_night", CompareOp::Lte, maximum.cents());
    }

    builder = builder.group_by("properties.id");

    if let Some(rating) = criteria.present_minimum_rating() {
        builder = builder.and_having("avg(property_reviews.rating)", CompareOp::Gte, rating);
    }

    builder
        .order_by("properties.cost_per_night")
        .limit(i64::from(limit.get()))
        .build()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SqlValue;

    fn baseline() -> ParameterizedQuery {
        build_property_search(&SearchCriteria::default(), ResultLimit::default())
    }

    #[test]
    fn test_no_criteria() {
        let query = baseline();
        let sql = query.sql();

        assert!(sql.contains("LEFT JOIN property_reviews"));
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("HAVING"));
        assert!(sql.contains("GROUP BY properties.id"));
        assert!(sql.contains("ORDER BY properties.cost_per_night"));
        assert!(sql.ends_with("LIMIT $1"));
        assert_eq!(query.params(), &[SqlValue::Int(10)]);
    }

    #[test]
    fn test_city_only() {
        let criteria = SearchCriteria::default().city("Vancouver");
        let query = build_property_search(&criteria, ResultLimit::default());

        assert!(query.sql().contains("WHERE properties.city LIKE $1"));
        assert!(query.sql().ends_with("LIMIT $2"));
        assert_eq!(
            query.params(),
            &[SqlValue::Text("%Vancouver%".to_string()), SqlValue::Int(10)]
        );
    }

    #[test]
    fn test_price_range_converts_to_cents() {
        let criteria = SearchCriteria::default().price_range(50, 200);
        let query = build_property_search(&criteria, ResultLimit::default());
        let sql = query.sql();

        assert!(sql.contains("WHERE properties.cost_per_night >= $1"));
        assert!(sql.contains("AND properties.cost_per_night <= $2"));
        assert_eq!(
            query.params(),
            &[SqlValue::Int(5000), SqlValue::Int(20000), SqlValue::Int(10)]
        );
    }

    #[test]
    fn test_first_present_filter_gets_where() {
        // No city, so the owner filter opens the WHERE clause.
        let criteria = SearchCriteria::default().owner(3);
        let query = build_property_search(&criteria, ResultLimit::default());

        assert!(query.sql().contains("WHERE properties.owner_id = $1"));
        assert!(!query.sql().contains("AND properties.owner_id"));
    }

    #[test]
    fn test_zero_rating_is_absent() {
        let criteria = SearchCriteria::default().minimum_rating(0.0);
        let query = build_property_search(&criteria, ResultLimit::default());

        assert_eq!(query.params().len(), baseline().params().len());
        assert!(!query.sql().contains("HAVING"));
        assert_eq!(query, baseline());
    }

    #[test]
    fn test_zero_and_empty_values_are_absent() {
        let criteria = SearchCriteria {
            city: Some(String::new()),
            owner_id: Some(0),
            minimum_price_per_night: Some(0),
            maximum_price_per_night: Some(0),
            minimum_rating: Some(f64::NAN),
        };

        assert_eq!(criteria.active_filters(), 0);
        assert_eq!(build_property_search(&criteria, ResultLimit::default()), baseline());
    }

    #[test]
    fn test_rating_goes_to_having() {
        let criteria = SearchCriteria::default().city("Van").minimum_rating(4.0);
        let query = build_property_search(&criteria, ResultLimit::default());
        let sql = query.sql();

        assert!(sql.contains("GROUP BY properties.id\nHAVING avg(property_reviews.rating) >= $2"));
        assert_eq!(query.params()[1], SqlValue::Float(4.0));
    }

    #[test]
    fn test_all_filters_in_fixed_order() {
        let criteria = SearchCriteria {
            city: Some("Calgary".to_string()),
            owner_id: Some(12),
            minimum_price_per_night: Some(50),
            maximum_price_per_night: Some(200),
            minimum_rating: Some(3.5),
        };
        let limit = ResultLimit::new(25).unwrap();
        let query = build_property_search(&criteria, limit);

        assert_eq!(
            query.params(),
            &[
                SqlValue::Text("%Calgary%".to_string()),
                SqlValue::Int(12),
                SqlValue::Int(5000),
                SqlValue::Int(20000),
                SqlValue::Float(3.5),
                SqlValue::Int(25),
            ]
        );

        let sql = query.sql();
        let positions: Vec<usize> = ["$1", "$2", "$3", "$4", "$5", "$6"]
            .iter()
            .map(|p| sql.find(p).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sql.matches("WHERE").count(), 1);
        assert_eq!(sql.matches("\nAND ").count(), 3);
        assert!(!sql.contains("$7"));
    }

    #[test]
    fn test_param_count_matches_present_filters() {
        let cases = [
            SearchCriteria::default(),
            SearchCriteria::default().city("A"),
            SearchCriteria::default().owner(1).minimum_rating(2.0),
            SearchCriteria::default().price_range(0, 300),
            SearchCriteria::default().city("B").price_range(10, 20).minimum_rating(0.0),
        ];

        for criteria in &cases {
            let query = build_property_search(criteria, ResultLimit::default());
            assert_eq!(query.params().len(), criteria.active_filters() + 1);
            assert_eq!(query.params().last(), Some(&SqlValue::Int(10)));
            let last = format!("LIMIT ${}", query.params().len());
            assert!(query.sql().ends_with(&last));
        }
    }

    #[test]
    fn test_builder_is_idempotent() {
        let criteria = SearchCriteria::default().city("Toronto").owner(4);
        let first = build_property_search(&criteria, ResultLimit::default());
        let second = build_property_search(&criteria, ResultLimit::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_limit() {
        assert_eq!(ResultLimit::default().get(), 10);
        assert_eq!(ResultLimit::new(3).unwrap().get(), 3);
        assert_eq!(ResultLimit::new(0), Err(CoreError::InvalidLimit(0)));
        assert_eq!(ResultLimit::try_from(-1), Err(CoreError::InvalidLimit(-1)));
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: SearchCriteria =
            serde_json::from_str(r#"{"city": "Vancouver", "minimum_rating": 4}"#).unwrap();

        assert_eq!(criteria.city.as_deref(), Some("Vancouver"));
        assert_eq!(criteria.minimum_rating, Some(4.0));
        assert_eq!(criteria.owner_id, None);
        assert_eq!(criteria.active_filters(), 2);
    }
}
