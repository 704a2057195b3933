//! # User Repository
//!
//! Lookup and registration of users.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use lightbnb_core::{NewUser, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: PgPool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by email (exact match).
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Looking up user by email");

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i32) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Registers a new user.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored row, including its new id
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &NewUser) -> DbResult<User> {
        debug!(email = %user.email, "Inserting user");

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
