//! # Error Types
//!
//! Domain-specific error types for lightbnb-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lightbnb-core errors (this file)                                       │
//! │  └── CoreError        - Invalid builder input                           │
//! │                                                                         │
//! │  lightbnb-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  Flow: CoreError → DbError::InvalidInput → web layer                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The builder itself cannot fail once its inputs exist. Errors here are
//! raised while *constructing* those inputs (e.g. a zero result limit).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while constructing search inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A result limit must return at least one row.
    ///
    /// ## When This Occurs
    /// - `ResultLimit::new(0)`
    /// - A web form passing `limit=0`
    #[error("Result limit must be positive, got {0}")]
    InvalidLimit(i64),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
