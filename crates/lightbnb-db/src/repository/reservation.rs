//! # Reservation Repository
//!
//! A guest's past reservations, joined with the property and its rating.
//!
//! ## Query Shape
//! ```text
//! reservations ──JOIN──► properties ──LEFT JOIN──► property_reviews
//!      │                                                  │
//!      └── guest_id = $1, started before today            └── avg(rating)
//!
//! GROUP BY reservation, newest first, LIMIT $2
//! ```

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use lightbnb_core::{Reservation, ResultLimit};

const PAST_RESERVATIONS: &str = r#"
    SELECT
        reservations.id AS reservation_id,
        properties.id AS property_id,
        properties.title,
        properties.thumbnail_photo_url,
        properties.cost_per_night,
        reservations.start_date,
        reservations.end_date,
        avg(property_reviews.rating)::float8 AS average_rating
    FROM reservations
    JOIN properties ON reservations.property_id = properties.id
    LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
    WHERE reservations.guest_id = $1
    AND reservations.start_date < now()::date
    GROUP BY properties.id, reservations.id
    ORDER BY reservations.start_date DESC
    LIMIT $2
"#;

/// Repository for reservation database operations.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: PgPool) -> Self {
        ReservationRepository { pool }
    }

    /// Lists reservations for `guest_id` that started before today,
    /// most recent first.
    pub async fn past_for_guest(
        &self,
        guest_id: i32,
        limit: ResultLimit,
    ) -> DbResult<Vec<Reservation>> {
        debug!(guest_id, limit = limit.get(), "Fetching past reservations");

        let reservations = sqlx::query_as::<_, Reservation>(PAST_RESERVATIONS)
            .bind(guest_id)
            .bind(i64::from(limit.get()))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = reservations.len(), "Reservations fetched");
        Ok(reservations)
    }

    /// Books `property_id` for `guest_id`. Returns the new reservation id.
    pub async fn insert(
        &self,
        guest_id: i32,
        property_id: i32,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> DbResult<i32> {
        debug!(guest_id, property_id, %start_date, %end_date, "Inserting reservation");

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reservations (guest_id, property_id, start_date, end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(guest_id)
        .bind(property_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::error::DbError;
    use crate::repository::test_support::{create_user, new_property, test_database, unique};
    use lightbnb_core::ResultLimit;

    #[tokio::test]
    #[ignore = "needs LIGHTBNB_TEST_DATABASE_URL"]
    async fn test_past_reservations_newest_first_and_limited() {
        let db = test_database().await;

        let owner = create_user(&db).await;
        let guest = create_user(&db).await;
        let property = db
            .properties()
            .insert(&new_property(owner.id, &unique("Resville"), 15000))
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        let reservations = db.reservations();
        for days_ago in [30, 20, 10] {
            let start = today - Duration::days(days_ago);
            reservations
                .insert(guest.id, property.id, start, start + Duration::days(3))
                .await
                .unwrap();
        }
        // Future stays are not part of the history.
        reservations
            .insert(guest.id, property.id, today + Duration::days(5), today + Duration::days(7))
            .await
            .unwrap();

        let all = reservations
            .past_for_guest(guest.id, ResultLimit::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].start_date > w[1].start_date));
        assert!(all.iter().all(|r| r.property_id == property.id));
        assert!(all.iter().all(|r| r.average_rating.is_none()));
        assert_eq!(all[0].nights(), 3);

        let limited = reservations
            .past_for_guest(guest.id, ResultLimit::new(2).unwrap())
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].start_date, today - Duration::days(10));
    }

    #[tokio::test]
    #[ignore = "needs LIGHTBNB_TEST_DATABASE_URL"]
    async fn test_guest_without_reservations_is_empty() {
        let db = test_database().await;

        let guest = create_user(&db).await;
        let none = db
            .reservations()
            .past_for_guest(guest.id, ResultLimit::default())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    #[ignore = "needs LIGHTBNB_TEST_DATABASE_URL"]
    async fn test_reservation_for_missing_property_fails() {
        let db = test_database().await;

        let guest = create_user(&db).await;
        let today = Utc::now().date_naive();
        let err = db
            .reservations()
            .insert(guest.id, -1, today, today + Duration::days(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
