//! # lightbnb-core: Pure Types and Query Building for LightBnB
//!
//! This crate holds everything in the LightBnB data layer that does not touch
//! a database: row types, search criteria and the SQL builder.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     LightBnB Architecture                               │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │                    Web Server (outside)                           │  │
//! │  │    /properties?city=..  /reservations  /users                     │  │
//! │  └─────────────────────────────┬─────────────────────────────────────┘  │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼─────────────────────────────────────┐  │
//! │  │               ★ lightbnb-core (THIS CRATE) ★                      │  │
//! │  │                                                                   │  │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐      │  │
//! │  │   │   types   │  │   money   │  │  search   │  │   query   │      │  │
//! │  │   │ Property  │  │   Money   │  │ Criteria  │  │  Select   │      │  │
//! │  │   │   User    │  │  ×100     │  │  Limit    │  │  Builder  │      │  │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘      │  │
//! │  │                                                                   │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS              │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼─────────────────────────────────────┐  │
//! │  │                  lightbnb-db (Database Layer)                     │  │
//! │  │          PgPool, repositories, migrations, error mapping          │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Row types (User, Property, PropertyListing, Reservation)
//! - [`money`] - Money type with integer cents
//! - [`query`] - Positional-placeholder SELECT builder
//! - [`search`] - Property search criteria and query construction
//! - [`error`] - Input error types
//!
//! ## Example Usage
//!
//! ```rust
//! use lightbnb_core::{build_property_search, ResultLimit, SearchCriteria};
//!
//! let criteria = SearchCriteria::default()
//!     .city("Vancouver")
//!     .price_range(50, 200);
//!
//! let query = build_property_search(&criteria, ResultLimit::default());
//!
//! // city, min price, max price, limit
//! assert_eq!(query.params().len(), 4);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod query;
pub mod search;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use query::{CompareOp, ParameterizedQuery, SelectBuilder, SqlValue};
pub use search::{build_property_search, ResultLimit, SearchCriteria, DEFAULT_RESULT_LIMIT};
pub use types::*;
