//! # Schema Migrations
//!
//! The LightBnB schema ships inside the binary.
//!
//! ```text
//! migrations/postgres/
//! ├── 0001_schema.sql           users, properties, reservations, property_reviews
//! └── 0002_search_indexes.sql   city, owner, cost, review and guest lookups
//!
//! run_migrations(pool)
//!   └── applies whatever is missing from _sqlx_migrations, in file order
//! ```
//!
//! Applied files are checksummed by sqlx. Editing one after it has run makes
//! the next `run_migrations` fail with `DbError::MigrationFailed`, so schema
//! changes always go in a new numbered file.

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/postgres");

/// Applies pending migrations. Running it on an up-to-date schema is a no-op.
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying LightBnB schema");
    MIGRATOR.run(pool).await?;
    info!("LightBnB schema is up to date");
    Ok(())
}

/// SQLSTATE for a missing relation.
const UNDEFINED_TABLE: &str = "42P01";

/// `(embedded, applied)` migration counts.
///
/// A database that has never been migrated has no `_sqlx_migrations` table
/// and reports zero applied. Any other failure is returned.
pub async fn migration_status(pool: &PgPool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 =
        match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
            .fetch_one(pool)
            .await
        {
            Ok(count) => count,
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNDEFINED_TABLE) => 0,
            Err(e) => return Err(e.into()),
        };

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{test_database, test_database_url, unique};

    #[tokio::test]
    async fn test_status_reports_unreachable_server() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy("postgres://nobody@127.0.0.1:1/nowhere")
            .unwrap();

        let err = migration_status(&pool).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::ConnectionFailed(_) | DbError::PoolExhausted
        ));
    }

    #[tokio::test]
    async fn test_status_on_closed_pool_is_an_error() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/nowhere")
            .unwrap();
        pool.close().await;

        let err = migration_status(&pool).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[tokio::test]
    #[ignore = "needs LIGHTBNB_TEST_DATABASE_URL"]
    async fn test_status_after_migrating() {
        let db = test_database().await;

        let (embedded, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(embedded, 2);
        assert_eq!(applied, embedded);
    }

    #[tokio::test]
    #[ignore = "needs LIGHTBNB_TEST_DATABASE_URL"]
    async fn test_status_without_bookkeeping_table_is_zero() {
        let db = test_database().await;
        let schema = unique("empty").replace('-', "_");
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(db.pool())
            .await
            .unwrap();

        let options = test_database_url()
            .parse::<PgConnectOptions>()
            .unwrap()
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        let status = migration_status(&pool).await.unwrap();
        assert_eq!(status, (2, 0));

        pool.close().await;
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", schema))
            .execute(db.pool())
            .await
            .unwrap();
    }
}
