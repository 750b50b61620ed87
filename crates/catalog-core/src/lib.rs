//! # catalog-core: Pure Types and Rules for the Product Catalog
//!
//! This crate holds everything about the catalog that does not touch a
//! database: the record types returned by the query engine, the pagination
//! contract, and the parameter validation a routing layer applies before
//! calling into storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Product Catalog Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                HTTP Routing (external collaborator)             │   │
//! │  │   GET /products  /products/search  /departments/{id}/products   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ validated PageRequest, ids, terms      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ catalog-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐                │   │
//! │  │   │   types   │  │ pagination │  │ validation │                │   │
//! │  │   │  Product  │  │ PageRequest│  │  page size │                │   │
//! │  │   │   Page    │  │ total_pages│  │  ids/terms │                │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 catalog-db (Database Layer)                     │   │
//! │  │         SQLite queries, department migration, repositories      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (CatalogProduct, Department, Page, ...)
//! - [`pagination`] - Page/offset arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Request parameter constraints
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::pagination::{total_pages, PageRequest};
//!
//! let request = PageRequest::new(3, 20).unwrap();
//! assert_eq!(request.offset(), 40);
//! assert_eq!(total_pages(41, request.page_size()), 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use pagination::PageRequest;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size a routing layer may accept.
///
/// The query engine itself only requires `page_size >= 1`; this upper bound
/// belongs to request validation.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Longest search term accepted by request validation (in characters).
pub const MAX_SEARCH_TERM_LEN: usize = 100;
