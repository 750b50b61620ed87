//! # Department Repository
//!
//! Read operations over the normalized `departments` table.
//!
//! ## Listing vs Detail
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Unknown department id = 99                                             │
//! │                                                                         │
//! │  products(99, page)   → Page { items: [], total_count: 0 }   (success) │
//! │  detail(99)           → DbError::NotFound                   (404)      │
//! │  get_by_id(99)        → DbError::NotFound                   (404)      │
//! │                                                                         │
//! │  A listing only filters; a detail needs the department row itself.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use catalog_core::{
    CatalogProduct, Department, DepartmentDetail, DepartmentSummary, Page, PageRequest,
};

use super::{fetch_product_page, fetch_products, ProductFilter, ProductOrder};
use crate::error::{DbError, DbResult};

const SELECT_SUMMARIES: &str = r#"
    SELECT d.id, d.name, COUNT(p.id) AS product_count
    FROM departments d
    LEFT JOIN products p ON p.department_id = d.id
    GROUP BY d.id, d.name
    ORDER BY d.name, d.id
"#;

const SELECT_SUMMARY_BY_ID: &str = r#"
    SELECT d.id, d.name, COUNT(p.id) AS product_count
    FROM departments d
    LEFT JOIN products p ON p.department_id = d.id
    WHERE d.id = ?1
    GROUP BY d.id, d.name
"#;

/// Repository for department queries.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: SqlitePool,
}

impl DepartmentRepository {
    /// Creates a new DepartmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DepartmentRepository { pool }
    }

    /// Lists every department with its linked product count, by name.
    ///
    /// Departments without products are included with a count of zero.
    pub async fn list(&self) -> DbResult<Vec<DepartmentSummary>> {
        let departments = sqlx::query(SELECT_SUMMARIES)
            .try_map(|row: SqliteRow| summary_from_row(&row))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = departments.len(), "Listed departments");
        Ok(departments)
    }

    /// Gets a department by id.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No department with this id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Department> {
        let department = sqlx::query("SELECT id, name FROM departments WHERE id = ?1")
            .bind(id)
            .try_map(|row: SqliteRow| {
                Ok(Department {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .fetch_optional(&self.pool)
            .await?;

        department.ok_or_else(|| DbError::not_found("Department", id))
    }

    /// Department metadata, aggregate product count, and all of its
    /// products ordered by name.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - The department itself doesn't exist
    pub async fn detail(&self, id: i64) -> DbResult<DepartmentDetail> {
        debug!(id, "Getting department detail");

        let mut tx = self.pool.begin().await?;

        let summary = summary_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Department", id))?;

        let filter = ProductFilter::Department { department_id: id };
        let products: Vec<CatalogProduct> =
            fetch_products(&mut tx, &filter, ProductOrder::NameThenId, None).await?;

        tx.commit().await?;

        Ok(DepartmentDetail {
            id: summary.id,
            name: summary.name,
            product_count: summary.product_count,
            products,
        })
    }

    /// Paginated products of one department, ordered by name.
    ///
    /// Like [`ProductRepository::list_by_department`](crate::ProductRepository::list_by_department),
    /// an unknown id yields an empty page rather than `NotFound`.
    pub async fn products(
        &self,
        department_id: i64,
        request: PageRequest,
    ) -> DbResult<Page<CatalogProduct>> {
        debug!(
            department_id,
            page = request.page(),
            page_size = request.page_size(),
            "Listing department products by name"
        );

        let filter = ProductFilter::Department { department_id };

        let mut tx = self.pool.begin().await?;
        let (items, total) =
            fetch_product_page(&mut tx, &filter, ProductOrder::NameThenId, request).await?;
        tx.commit().await?;

        Ok(Page::new(items, total, request).with_department_id(department_id))
    }
}

async fn summary_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> DbResult<Option<DepartmentSummary>> {
    let summary = sqlx::query(SELECT_SUMMARY_BY_ID)
        .bind(id)
        .try_map(|row: SqliteRow| summary_from_row(&row))
        .fetch_optional(&mut *conn)
        .await?;

    Ok(summary)
}

fn summary_from_row(row: &SqliteRow) -> Result<DepartmentSummary, sqlx::Error> {
    Ok(DepartmentSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        product_count: row.try_get("product_count")?,
    })
}
