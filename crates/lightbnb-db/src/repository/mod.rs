//! # Repository Module
//!
//! Database repository implementations for LightBnB.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Web handler                                                            │
//! │       │                                                                 │
//! │       │  db.properties().search(&criteria, limit)                       │
//! │       ▼                                                                 │
//! │  PropertyRepository                                                     │
//! │  ├── build_property_search()  ← lightbnb-core, pure                     │
//! │  ├── bind_params()            ← SqlValue → sqlx bind, in order          │
//! │  └── fetch_all(&pool)         ← one round trip                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Lookup and registration
//! - [`ReservationRepository`](reservation::ReservationRepository) - Guest history
//! - [`PropertyRepository`](property::PropertyRepository) - Search and creation

pub mod property;
pub mod reservation;
pub mod user;

use std::future::Future;
use std::time::Duration;

use lightbnb_core::SqlValue;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;
use tracing::warn;

use crate::error::{DbError, DbResult};

/// Binds builder parameters onto a sqlx query in placeholder order.
pub(crate) fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Text(text) => query.bind(text.as_str()),
            SqlValue::Int(int) => query.bind(*int),
            SqlValue::Float(float) => query.bind(*float),
        };
    }
    query
}

/// Runs `operation`, giving up after `limit`.
///
/// Dropping the in-flight query releases its connection back to the pool.
pub(crate) async fn with_timeout<T, F>(limit: Duration, operation: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "Query timed out");
            Err(DbError::Timeout)
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, DbError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, DbError>(())
        };
        let result = with_timeout(Duration::from_millis(10), slow).await;
        assert!(matches!(result, Err(DbError::Timeout)));
    }

    #[tokio::test]
    async fn test_with_timeout_keeps_query_errors() {
        let failing = async { Err::<(), _>(DbError::QueryFailed("syntax error".to_string())) };
        let result = with_timeout(Duration::from_secs(1), failing).await;
        assert!(matches!(result, Err(DbError::QueryFailed(_))));
    }
}
