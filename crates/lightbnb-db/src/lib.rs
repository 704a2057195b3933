//! # lightbnb-db: Database Layer for LightBnB
//!
//! This crate provides database access for the LightBnB booking app.
//! It uses PostgreSQL through a bounded sqlx pool.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     LightBnB Data Flow                                  │
//! │                                                                         │
//! │  Web handler (GET /properties?city=Vancouver)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │                  lightbnb-db (THIS CRATE)                         │  │
//! │  │                                                                   │  │
//! │  │   ┌───────────────┐   ┌─────────────────┐   ┌──────────────┐      │  │
//! │  │   │   Database    │   │  Repositories   │   │  Migrations  │      │  │
//! │  │   │   (pool.rs)   │   │                 │   │  (embedded)  │      │  │
//! │  │   │               │   │ UserRepo        │   │ 0001_schema  │      │  │
//! │  │   │ PgPool        │◄──│ ReservationRepo │   │ 0002_indexes │      │  │
//! │  │   │ DbConfig(env) │   │ PropertyRepo    │   │              │      │  │
//! │  │   └───────────────┘   └─────────────────┘   └──────────────┘      │  │
//! │  │                                                                   │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │                    PostgreSQL (lightbnb)                          │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (user, reservation, property)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lightbnb_core::{ResultLimit, SearchCriteria};
//! use lightbnb_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let criteria = SearchCriteria::default().city("Vancouver").price_range(50, 200);
//! let listings = db.properties().search(&criteria, ResultLimit::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::property::PropertyRepository;
pub use repository::reservation::ReservationRepository;
pub use repository::user::UserRepository;
