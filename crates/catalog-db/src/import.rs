//! # Product CSV Import
//!
//! Loads the product catalog export (one row per product, header row
//! required) into the legacy `products` table, then links departments.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  data/products.csv                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  read_products()      header-matched columns → Vec<LegacyProduct>      │
//! │       │               (empty cells → None, unknown columns ignored)    │
//! │       ▼                                                                 │
//! │  import_products()                                                      │
//! │       ├── ProductLoader::insert_all     one transaction                 │
//! │       └── DepartmentMigration::run      departments + department_id     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ImportSummary { rows, inserted, report }                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recognized columns: `id`, `name`, `category` (required) and `brand`,
//! `retail_price`, `cost`, `department`, `sku`, `distribution_center_id`
//! (optional). Column order does not matter.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use catalog_core::{LegacyProduct, MigrationReport};

use crate::error::DbError;
use crate::pool::Database;

/// Import failures.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read or a row did not match the columns.
    ///
    /// The message carries the record and line position.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Inserting or linking failed (e.g. a duplicate product id).
    #[error(transparent)]
    Database(#[from] DbError),
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Outcome of one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows read from the CSV.
    pub rows: usize,
    /// Rows inserted into `products`.
    pub inserted: u64,
    /// Department migration report after the load.
    pub report: MigrationReport,
}

/// Reads every product row from CSV data.
///
/// Stops at the first malformed row; nothing is returned for a partial file.
pub fn read_products<R: io::Read>(reader: R) -> ImportResult<Vec<LegacyProduct>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let products = csv_reader
        .deserialize::<LegacyProduct>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(products)
}

/// Reads every product row from a CSV file.
pub fn read_products_from_path(path: impl AsRef<Path>) -> ImportResult<Vec<LegacyProduct>> {
    let file = std::fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    read_products(io::BufReader::new(file))
}

/// Inserts `products` and runs the department normalization.
///
/// The insert is all-or-nothing; a duplicate id aborts the whole batch.
pub async fn import_products(
    db: &Database,
    products: &[LegacyProduct],
) -> ImportResult<ImportSummary> {
    let inserted = db.loader().insert_all(products).await?;
    let report = db.department_migration().run().await?;

    info!(
        rows = products.len(),
        inserted,
        departments = report.department_count,
        orphaned = report.orphaned_products,
        "Imported products"
    );

    Ok(ImportSummary {
        rows: products.len(),
        inserted,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;

    const EXPORT: &str = "\
id,cost,category,name,brand,retail_price,department,sku,distribution_center_id
1,40.00,Shoes,Nike Running Shoes,Nike,89.99,Men,NK-001,1
2,,Jeans,\"Levi's 501 Jeans, Stonewash\",Levi's,59.5,Men,,2
3,,Gifts,Gift Card,,,,,
4,15.25,Dresses,Summer Dress,Zara,39.0,Women,ZR-9,3
";

    #[test]
    fn test_read_products_by_header() {
        let products = read_products(EXPORT.as_bytes()).unwrap();

        assert_eq!(products.len(), 4);
        assert_eq!(
            products[0],
            LegacyProduct::new(1, "Nike Running Shoes", "Shoes")
                .brand("Nike")
                .department("Men")
                .sku("NK-001")
                .pricing(89.99, 40.0)
                .distribution_center(1)
        );
        assert_eq!(products[1].name, "Levi's 501 Jeans, Stonewash");
        assert_eq!(products[1].cost, None);
        assert_eq!(products[1].sku, None);
        assert_eq!(products[2], LegacyProduct::new(3, "Gift Card", "Gifts"));
    }

    #[test]
    fn test_read_products_rejects_bad_row() {
        let data = "id,name,category\n1,Tote,Bags\nseven,Wallet,Accessories\n";

        let err = read_products(data.as_bytes()).unwrap_err();

        assert!(matches!(err, ImportError::Csv(_)));
        assert!(err.to_string().contains("line: 3"), "{err}");
    }

    #[test]
    fn test_read_products_requires_core_columns() {
        let data = "id,brand\n1,Nike\n";

        assert!(read_products(data.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_products_from_path("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
    }

    #[tokio::test]
    async fn test_import_links_departments() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = read_products(EXPORT.as_bytes()).unwrap();

        let summary = import_products(&db, &products).await.unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.inserted, 4);
        assert_eq!(summary.report.department_count, 2);
        assert_eq!(summary.report.linked_products, 3);
        assert!(summary.report.is_clean());

        let jeans = db.products().get_by_id(2).await.unwrap();
        assert_eq!(jeans.department_name.as_deref(), Some("Men"));
        assert_eq!(jeans.retail_price, Some(59.5));

        let gift = db.products().get_by_id(3).await.unwrap();
        assert_eq!(gift.department_id, None);
    }

    #[tokio::test]
    async fn test_import_twice_fails_on_duplicate_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = read_products(EXPORT.as_bytes()).unwrap();
        import_products(&db, &products).await.unwrap();

        let err = import_products(&db, &products).await.unwrap_err();

        assert!(matches!(
            err,
            ImportError::Database(DbError::UniqueViolation { .. })
        ));
        assert_eq!(db.products().count().await.unwrap(), 4);
    }
}
