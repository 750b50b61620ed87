//! # Validation Module
//!
//! Request parameter constraints for the catalog query surface.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Routing (external)                                           │
//! │  ├── Parses query strings / path segments                              │
//! │  └── Calls THIS MODULE before touching storage                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Query engine (catalog-db)                                    │
//! │  └── Accepts only PageRequest (page >= 1, page_size >= 1)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE department names                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::validation::{parse_id, validate_page_request};
//!
//! let request = validate_page_request(Some(2), Some(25)).unwrap();
//! assert_eq!(request.offset(), 25);
//!
//! assert_eq!(parse_id("product_id", "42").unwrap(), 42);
//! assert!(parse_id("product_id", "abc").is_err());
//! ```

use crate::error::ValidationError;
use crate::pagination::PageRequest;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_SEARCH_TERM_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Pagination Validators
// =============================================================================

/// Validates optional `page`/`page_size` query parameters.
///
/// ## Rules
/// - `page` defaults to 1 and must be >= 1
/// - `page_size` defaults to [`DEFAULT_PAGE_SIZE`] and must be within
///   `1..=MAX_PAGE_SIZE`
pub fn validate_page_request(
    page: Option<i64>,
    page_size: Option<i64>,
) -> ValidationResult<PageRequest> {
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }
    let page = u32::try_from(page).map_err(|_| ValidationError::OutOfRange {
        field: "page".to_string(),
        min: 1,
        max: i64::from(u32::MAX),
    })?;

    let page_size = page_size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
    validate_page_size(page_size)?;

    // Both values are range-checked above.
    PageRequest::new(page, page_size as u32)
}

/// Validates a page size.
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_page_size;
///
/// assert!(validate_page_size(1).is_ok());
/// assert!(validate_page_size(100).is_ok());
/// assert!(validate_page_size(0).is_err());
/// assert!(validate_page_size(101).is_err());
/// ```
pub fn validate_page_size(page_size: i64) -> ValidationResult<()> {
    if !(1..=i64::from(MAX_PAGE_SIZE)).contains(&page_size) {
        return Err(ValidationError::OutOfRange {
            field: "page_size".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required search term.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_SEARCH_TERM_LEN`] characters
///
/// ## Returns
/// The term with surrounding whitespace removed.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.is_empty() {
        return Err(ValidationError::Required {
            field: "search".to_string(),
        });
    }

    if term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_TERM_LEN,
        });
    }

    Ok(term.to_string())
}

/// Normalizes the optional `search` parameter of the plain listing.
///
/// A missing or blank term means "no search" (`Ok(None)`), so the caller
/// falls back to the unfiltered listing.
pub fn optional_search_term(term: Option<&str>) -> ValidationResult<Option<String>> {
    match term {
        Some(t) if !t.trim().is_empty() => validate_search_term(t).map(Some),
        _ => Ok(None),
    }
}

// =============================================================================
// Identity Validators
// =============================================================================

/// Parses a numeric identity from a path segment.
///
/// ## Rules
/// - Must be an integer
/// - Must be positive (SQLite rowids start at 1)
pub fn parse_id(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let id: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be an integer".to_string(),
    })?;

    if id < 1 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================
