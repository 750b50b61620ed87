//! # Legacy Product Loader
//!
//! Bulk-inserts products in the flat, pre-normalization shape.
//!
//! Used by the CSV [`import`](crate::import), the `seed` binary and tests.
//! The query surface itself never writes.

use sqlx::SqlitePool;
use tracing::debug;

use catalog_core::LegacyProduct;

use crate::error::{DbError, DbResult};

const INSERT_PRODUCT: &str = r#"
    INSERT INTO products (
        id, name, category, brand, retail_price, cost,
        department, sku, distribution_center_id
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

/// Loads legacy product rows.
#[derive(Debug, Clone)]
pub struct ProductLoader {
    pool: SqlitePool,
}

impl ProductLoader {
    pub fn new(pool: SqlitePool) -> Self {
        ProductLoader { pool }
    }

    /// Inserts all products in one transaction.
    ///
    /// `department_id` is left unset; run the department migration
    /// afterwards to link the rows.
    ///
    /// ## Returns
    /// * `Ok(n)` - Number of rows inserted
    /// * `Err(DbError::UniqueViolation)` - An id already exists (nothing is
    ///   inserted)
    pub async fn insert_all(&self, products: &[LegacyProduct]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for product in products {
            let result = sqlx::query(INSERT_PRODUCT)
                .bind(product.id)
                .bind(&product.name)
                .bind(&product.category)
                .bind(&product.brand)
                .bind(product.retail_price)
                .bind(product.cost)
                .bind(&product.department)
                .bind(&product.sku)
                .bind(product.distribution_center_id)
                .execute(&mut *tx)
                .await
                .map_err(|err| match DbError::from(err) {
                    DbError::UniqueViolation { field, .. } => {
                        DbError::duplicate(field, product.id.to_string())
                    }
                    other => other,
                })?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        debug!(inserted, "Loaded legacy products");
        Ok(inserted)
    }
}
