//! # Domain Types
//!
//! Record types returned by the catalog query engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌─────────────────┐                   │
//! │  │   CatalogProduct     │        │   Department    │                   │
//! │  │  ──────────────────  │  0..1  │  ─────────────  │                   │
//! │  │  id                  │───────►│  id             │                   │
//! │  │  name, category      │        │  name (unique)  │                   │
//! │  │  department (legacy) │        └─────────────────┘                   │
//! │  │  department_id   ◄── joined ──┘                                     │
//! │  │  department_name ◄── joined                                         │
//! │  └──────────────────────┘                                              │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌──────────────────────┐                   │
//! │  │      Page<T>         │   │  DepartmentSummary   │                   │
//! │  │  items, total_count  │   │  id, name,           │                   │
//! │  │  page, page_size     │   │  product_count       │                   │
//! │  │  total_pages         │   └──────────────────────┘                   │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Legacy vs Normalized Department
//! Products carry both the legacy flat `department` string and the
//! normalized `department_id`/`department_name` pair. Both are exposed so
//! existing consumers keep working.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::pagination::PageRequest;

// =============================================================================
// Product
// =============================================================================

/// A product joined with its department.
///
/// This is the row shape of every product listing: plain, search and
/// department-filtered results all produce exactly these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogProduct {
    /// Stable product identity.
    pub id: i64,

    pub name: String,

    pub category: String,

    pub brand: Option<String>,

    pub retail_price: Option<f64>,

    pub cost: Option<f64>,

    /// Legacy flat department name, kept for backward compatibility.
    pub department: Option<String>,

    pub sku: Option<String>,

    /// Opaque reference to a distribution center (not modelled here).
    pub distribution_center_id: Option<i64>,

    /// Id of the joined department row, `None` when unlinked.
    pub department_id: Option<i64>,

    /// Name of the joined department row, `None` when unlinked.
    pub department_name: Option<String>,
}

/// A flat product row as it exists before department normalization.
///
/// Used by the seed tool and tests to load data in the legacy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyProduct {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub retail_price: Option<f64>,
    pub cost: Option<f64>,
    pub department: Option<String>,
    pub sku: Option<String>,
    pub distribution_center_id: Option<i64>,
}

impl LegacyProduct {
    /// Creates a product with only the required fields set.
    pub fn new(id: i64, name: impl Into<String>, category: impl Into<String>) -> Self {
        LegacyProduct {
            id,
            name: name.into(),
            category: category.into(),
            brand: None,
            retail_price: None,
            cost: None,
            department: None,
            sku: None,
            distribution_center_id: None,
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn pricing(mut self, retail_price: f64, cost: f64) -> Self {
        self.retail_price = Some(retail_price);
        self.cost = Some(cost);
        self
    }

    pub fn distribution_center(mut self, id: i64) -> Self {
        self.distribution_center_id = Some(id);
        self
    }
}

// =============================================================================
// Department
// =============================================================================

/// A normalized department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// A department annotated with the number of products linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DepartmentSummary {
    pub id: i64,
    pub name: String,
    /// Products whose `department_id` points here (zero included).
    pub product_count: i64,
}

/// Department metadata plus every product in it, ordered by product name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DepartmentDetail {
    pub id: i64,
    pub name: String,
    pub product_count: i64,
    pub products: Vec<CatalogProduct>,
}

// =============================================================================
// Page Envelope
// =============================================================================

/// Uniform paginated envelope returned by every listing.
///
/// `search_term` is echoed by search results and `department_id` by
/// department-filtered results; both are omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub search_term: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub department_id: Option<i64>,
}

impl<T> Page<T> {
    /// Builds the envelope for one page of a result of `total_count` rows.
    pub fn new(items: Vec<T>, total_count: i64, request: PageRequest) -> Self {
        Page {
            items,
            total_count,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: request.total_pages(total_count),
            search_term: None,
            department_id: None,
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_department_id(mut self, department_id: i64) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// True when this page holds no items (an empty result or past the end).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Migration Report
// =============================================================================

/// Outcome of the department normalization's verification step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MigrationReport {
    /// Rows in the `departments` table.
    pub department_count: i64,
    /// Products with a non-null `department_id`.
    pub linked_products: i64,
    /// Products with a non-empty legacy `department` but no `department_id`.
    pub orphaned_products: i64,
}

impl MigrationReport {
    /// True when every legacy department string resolved to a department.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.orphaned_products == 0
    }

    /// Escalates orphans into an error for callers that treat them as fatal.
    pub fn ensure_clean(&self) -> Result<(), CoreError> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(CoreError::IntegrityFailure {
                orphaned: self.orphaned_products,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
