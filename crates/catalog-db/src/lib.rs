//! # catalog-db: Database Layer for the Product Catalog
//!
//! This crate provides database access for the catalog query service.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Product Catalog Data Flow                         │
//! │                                                                         │
//! │  Routing (GET /api/products?search=nike&page=1)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │    │                │   │               │  │   │
//! │  │   │               │    │ ProductRepo    │   │ 0001 products │  │   │
//! │  │   │ SqlitePool    │◄───│ DepartmentRepo │   │ departments   │  │   │
//! │  │   │ Connection    │    │                │   │ normalization │  │   │
//! │  │   └───────────────┘    └────────────────┘   └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: products ──department_id──► departments                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool management
//! - [`config`] - Environment-based configuration
//! - [`migrations`] - Embedded schema + department normalization
//! - [`error`] - Database error types
//! - [`import`] - Product CSV import pipeline
//! - [`loader`] - Bulk load of legacy (flat) product rows
//! - [`repository`] - Query engine (products, departments)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_core::PageRequest;
//! use catalog_db::{CatalogConfig, Database};
//!
//! let config = CatalogConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let page = db.products().search("nike", PageRequest::new(1, 20)?).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod import;
pub mod loader;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CatalogConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use import::{ImportError, ImportSummary};
pub use loader::ProductLoader;
pub use migrations::departments::DepartmentMigration;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::department::DepartmentRepository;
pub use repository::product::ProductRepository;

/// Initializes `tracing` output for the catalog binaries.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_db=debug,sqlx=warn"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
