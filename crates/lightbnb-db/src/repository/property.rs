//! # Property Repository
//!
//! Database operations for property listings.
//!
//! ## Search Round Trip
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Property Search Works                            │
//! │                                                                         │
//! │  SearchCriteria { city: "Van", max price: 200 }, limit 10               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_property_search()  (lightbnb-core, no I/O)                       │
//! │       │   sql:    ... WHERE properties.city LIKE $1                     │
//! │       │               AND properties.cost_per_night <= $2 ... LIMIT $3  │
//! │       │   params: ["%Van%", 20000, 10]                                  │
//! │       ▼                                                                 │
//! │  bind_params() → fetch_all(&pool)                                       │
//! │       │                                                                 │
//! │       ├── Ok(rows)  → Vec<PropertyListing> (possibly empty)             │
//! │       └── Err(e)    → DbError, logged AND returned                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use sqlx::PgPool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{bind_params, with_timeout};
use lightbnb_core::{
    build_property_search, NewProperty, Property, PropertyListing, ResultLimit, SearchCriteria,
};

/// Repository for property database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = PropertyRepository::new(pool);
///
/// let criteria = SearchCriteria::default().city("Vancouver").minimum_rating(4.0);
/// let listings = repo.search(&criteria, ResultLimit::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    /// Creates a new PropertyRepository.
    pub fn new(pool: PgPool) -> Self {
        PropertyRepository { pool }
    }

    /// Searches listings matching `criteria`, cheapest first.
    ///
    /// ## Returns
    /// * `Ok(vec![])` - Nothing matched
    /// * `Ok(listings)` - Up to `limit` listings with their average rating
    /// * `Err(DbError)` - The query itself failed
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        limit: ResultLimit,
    ) -> DbResult<Vec<PropertyListing>> {
        let query = build_property_search(criteria, limit);

        debug!(
            sql = %query.sql(),
            params = ?query.params(),
            filters = criteria.active_filters(),
            "Searching properties"
        );

        let statement = sqlx::query_as::<_, PropertyListing>(query.sql());
        let listings = bind_params(statement, query.params())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                let err = DbError::from(e);
                warn!(error = %err, "Property search failed");
                err
            })?;

        debug!(count = listings.len(), "Search returned listings");
        Ok(listings)
    }

    /// Like [`search`](Self::search), failing with `DbError::Timeout` if the
    /// round trip takes longer than `timeout`.
    pub async fn search_with_timeout(
        &self,
        criteria: &SearchCriteria,
        limit: ResultLimit,
        timeout: Duration,
    ) -> DbResult<Vec<PropertyListing>> {
        with_timeout(timeout, self.search(criteria, limit)).await
    }

    /// Gets a property by its ID.
    pub async fn get_by_id(&self, id: i32) -> DbResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(property)
    }

    /// Inserts a new property.
    ///
    /// ## Returns
    /// * `Ok(Property)` - The stored row with its new id
    /// * `Err(DbError::ForeignKeyViolation)` - Owner doesn't exist
    pub async fn insert(&self, property: &NewProperty) -> DbResult<Property> {
        debug!(owner_id = property.owner_id, title = %property.title, "Inserting property");

        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id, title, description,
                thumbnail_photo_url, cover_photo_url,
                cost_per_night, parking_spaces,
                number_of_bathrooms, number_of_bedrooms,
                country, street, city, province, post_code,
                active
            ) VALUES (
                $1, $2, $3,
                $4, $5,
                $6, $7,
                $8, $9,
                $10, $11, $12, $13, $14,
                $15
            )
            RETURNING *
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .bind(&property.country)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(property.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(property)
    }

    /// Counts listings (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
