//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CoreError        - Domain errors (integrity, validation)          │
//! │  └── ValidationError  - Request parameter failures                     │
//! │                                                                         │
//! │  catalog-db errors (separate crate)                                    │
//! │  └── DbError          - NotFound + storage failures                    │
//! │                                                                         │
//! │  Routing layer (external)                                              │
//! │  └── maps ValidationError → 400, NotFound → 404, storage → 500         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Catalog domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The department migration left products whose legacy `department`
    /// string has no matching department row.
    ///
    /// ## When This Occurs
    /// Only when a caller escalates a
    /// [`MigrationReport`](crate::types::MigrationReport) via
    /// `ensure_clean()`. The migration itself reports orphans, it does not
    /// abort on them.
    #[error("Department migration left {orphaned} orphaned products")]
    IntegrityFailure { orphaned: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before a request reaches the query engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric identity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
