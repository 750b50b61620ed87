//! # Department Normalization
//!
//! Moves the free-text `products.department` column into a `departments`
//! lookup table referenced by `products.department_id`.
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Department Migration (one transaction)                 │
//! │                                                                         │
//! │  products (before)                 departments (after)                  │
//! │  ┌────┬───────────────┬───────┐    ┌────┬───────┐                       │
//! │  │ id │ name          │ dept  │    │ id │ name  │                       │
//! │  ├────┼───────────────┼───────┤    ├────┼───────┤                       │
//! │  │ 1  │ Running Shoes │ Men   │    │ 1  │ Men   │                       │
//! │  │ 2  │ Summer Dress  │ Women │    │ 2  │ Women │                       │
//! │  │ 3  │ Gift Card     │ NULL  │    └────┴───────┘                       │
//! │  └────┴───────────────┴───────┘                                        │
//! │                                                                         │
//! │  1. ensure_departments_table      CREATE TABLE IF NOT EXISTS           │
//! │  2. ensure_department_id_column   ALTER only if column is missing      │
//! │  3. extract_unique_departments    DISTINCT non-empty, sorted           │
//! │  4. populate_departments          INSERT OR IGNORE                     │
//! │  5. backfill_product_department_id exact, case-sensitive name match    │
//! │  6. ensure_department_index       CREATE INDEX IF NOT EXISTS           │
//! │  7. verify                        counts + orphans → MigrationReport   │
//! │                                                                         │
//! │  products.department is NEVER dropped (compatibility field)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is idempotent, so running the whole migration again yields the
//! same department rows and the same `department_id` values.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use catalog_core::MigrationReport;

use crate::error::DbResult;

const CREATE_DEPARTMENTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS departments (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT    NOT NULL UNIQUE CHECK (name <> '')
    )
"#;

const DEPARTMENT_ID_COLUMN_EXISTS: &str = r#"
    SELECT COUNT(*) FROM pragma_table_info('products')
    WHERE name = 'department_id'
"#;

const ADD_DEPARTMENT_ID_COLUMN: &str = r#"
    ALTER TABLE products
    ADD COLUMN department_id INTEGER REFERENCES departments(id)
"#;

const CREATE_DEPARTMENT_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_products_department_id
    ON products(department_id)
"#;

const SELECT_UNIQUE_DEPARTMENTS: &str = r#"
    SELECT DISTINCT department
    FROM products
    WHERE department IS NOT NULL
      AND department != ''
    ORDER BY department
"#;

/// Insert-or-ignore: a name that already exists (UNIQUE conflict) is
/// skipped without error, which is what makes re-runs no-ops.
const INSERT_DEPARTMENT: &str = "INSERT OR IGNORE INTO departments (name) VALUES (?1)";

const BACKFILL_DEPARTMENT_ID: &str = r#"
    UPDATE products
    SET department_id = (
        SELECT d.id
        FROM departments d
        WHERE d.name = products.department
    )
    WHERE department IS NOT NULL
      AND department != ''
"#;

const COUNT_DEPARTMENTS: &str = "SELECT COUNT(*) FROM departments";

const COUNT_LINKED_PRODUCTS: &str =
    "SELECT COUNT(*) FROM products WHERE department_id IS NOT NULL";

const COUNT_ORPHANED_PRODUCTS: &str = r#"
    SELECT COUNT(*)
    FROM products
    WHERE department IS NOT NULL
      AND department != ''
      AND department_id IS NULL
"#;

/// The department normalization migration.
///
/// Each public step acquires its own connection and can be run on its own;
/// [`run`](Self::run) executes all of them inside one transaction.
///
/// ## Usage
/// ```rust,ignore
/// let report = db.department_migration().run().await?;
/// if !report.is_clean() {
///     eprintln!("{} products could not be linked", report.orphaned_products);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DepartmentMigration {
    pool: SqlitePool,
}

impl DepartmentMigration {
    /// Creates a new DepartmentMigration.
    pub fn new(pool: SqlitePool) -> Self {
        DepartmentMigration { pool }
    }

    /// Runs every step in order within a single transaction.
    ///
    /// A database with no legacy departments still succeeds: the schema is
    /// ensured and the report shows zero departments.
    pub async fn run(&self) -> DbResult<MigrationReport> {
        info!("Running department migration");

        let mut tx = self.pool.begin().await?;

        ensure_departments_table(&mut tx).await?;
        ensure_department_id_column(&mut tx).await?;

        let names = extract_unique_departments(&mut tx).await?;
        if names.is_empty() {
            info!("No legacy departments found in products");
        }

        let inserted = populate_departments(&mut tx, &names).await?;
        let linked = backfill_product_department_id(&mut tx).await?;
        ensure_department_index(&mut tx).await?;

        let report = verify(&mut tx).await?;

        tx.commit().await?;

        info!(
            distinct_names = names.len(),
            inserted,
            linked,
            departments = report.department_count,
            linked_products = report.linked_products,
            orphaned_products = report.orphaned_products,
            "Department migration finished"
        );
        if !report.is_clean() {
            warn!(
                orphaned = report.orphaned_products,
                "Department migration left orphaned products"
            );
        }

        Ok(report)
    }

    /// Creates the `departments` table if absent.
    pub async fn ensure_departments_table(&self) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        ensure_departments_table(&mut conn).await
    }

    /// Adds `products.department_id` if absent.
    ///
    /// ## Returns
    /// `true` when the column was added by this call.
    pub async fn ensure_department_id_column(&self) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        ensure_department_id_column(&mut conn).await
    }

    /// Scans products for distinct, non-empty legacy department names.
    ///
    /// The result is sorted and fully materialized; each call re-scans.
    pub async fn extract_unique_departments(&self) -> DbResult<Vec<String>> {
        let mut conn = self.pool.acquire().await?;
        extract_unique_departments(&mut conn).await
    }

    /// Inserts each name as a department, skipping names that already
    /// exist and empty strings.
    ///
    /// ## Returns
    /// Number of departments actually created.
    pub async fn populate_departments(&self, names: &[String]) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;
        let inserted = populate_departments(&mut tx, names).await?;
        tx.commit().await?;
        Ok(inserted)
    }

    /// Links every product with a non-empty legacy department to the
    /// department of exactly the same name.
    ///
    /// ## Returns
    /// Number of product rows updated.
    pub async fn backfill_product_department_id(&self) -> DbResult<u64> {
        let mut conn = self.pool.acquire().await?;
        backfill_product_department_id(&mut conn).await
    }

    /// Creates the index on `products.department_id` if absent.
    pub async fn ensure_department_index(&self) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        ensure_department_index(&mut conn).await
    }

    /// Computes the verification report.
    pub async fn verify(&self) -> DbResult<MigrationReport> {
        let mut conn = self.pool.acquire().await?;
        verify(&mut conn).await
    }
}

// =============================================================================
// Steps
// =============================================================================

async fn ensure_departments_table(conn: &mut SqliteConnection) -> DbResult<()> {
    sqlx::query(CREATE_DEPARTMENTS_TABLE).execute(&mut *conn).await?;
    Ok(())
}

async fn ensure_department_id_column(conn: &mut SqliteConnection) -> DbResult<bool> {
    let present: i64 = sqlx::query_scalar(DEPARTMENT_ID_COLUMN_EXISTS)
        .fetch_one(&mut *conn)
        .await?;

    if present > 0 {
        debug!("products.department_id already exists");
        return Ok(false);
    }

    sqlx::query(ADD_DEPARTMENT_ID_COLUMN)
        .execute(&mut *conn)
        .await?;
    info!("Added products.department_id column");
    Ok(true)
}

async fn extract_unique_departments(conn: &mut SqliteConnection) -> DbResult<Vec<String>> {
    let names: Vec<String> = sqlx::query_scalar(SELECT_UNIQUE_DEPARTMENTS)
        .fetch_all(&mut *conn)
        .await?;

    debug!(count = names.len(), "Extracted unique departments");
    Ok(names)
}

async fn populate_departments(conn: &mut SqliteConnection, names: &[String]) -> DbResult<u64> {
    let mut inserted = 0;

    for name in names.iter().filter(|name| !name.is_empty()) {
        let result = sqlx::query(INSERT_DEPARTMENT)
            .bind(name)
            .execute(&mut *conn)
            .await?;
        inserted += result.rows_affected();
    }

    debug!(
        requested = names.len(),
        inserted, "Populated departments"
    );
    Ok(inserted)
}

async fn backfill_product_department_id(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query(BACKFILL_DEPARTMENT_ID)
        .execute(&mut *conn)
        .await?;

    debug!(updated = result.rows_affected(), "Backfilled department_id");
    Ok(result.rows_affected())
}

async fn ensure_department_index(conn: &mut SqliteConnection) -> DbResult<()> {
    sqlx::query(CREATE_DEPARTMENT_INDEX)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn verify(conn: &mut SqliteConnection) -> DbResult<MigrationReport> {
    let department_count: i64 = sqlx::query_scalar(COUNT_DEPARTMENTS)
        .fetch_one(&mut *conn)
        .await?;

    let linked_products: i64 = sqlx::query_scalar(COUNT_LINKED_PRODUCTS)
        .fetch_one(&mut *conn)
        .await?;

    let orphaned_products: i64 = sqlx::query_scalar(COUNT_ORPHANED_PRODUCTS)
        .fetch_one(&mut *conn)
        .await?;

    Ok(MigrationReport {
        department_count,
        linked_products,
        orphaned_products,
    })
}

#[cfg(test)]
mod tests {
    use catalog_core::{CoreError, LegacyProduct, PageRequest};

    use crate::pool::{Database, DbConfig};
    use crate::test_support::{catalog_with, storefront};

    /// The products table as it existed before normalization.
    const CREATE_LEGACY_PRODUCTS: &str = r#"
        CREATE TABLE products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            brand TEXT,
            retail_price REAL,
            cost REAL,
            department TEXT,
            sku TEXT,
            distribution_center_id INTEGER
        )
    "#;

    async fn links(db: &Database) -> Vec<(i64, Option<i64>)> {
        sqlx::query_as("SELECT id, department_id FROM products ORDER BY id")
            .fetch_all(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_links_every_product_with_a_department() {
        let db = catalog_with(&storefront()).await;

        let report = db.department_migration().verify().await.unwrap();

        assert_eq!(report.department_count, 3);
        assert_eq!(report.linked_products, 5);
        assert!(report.is_clean());
        assert!(report.ensure_clean().is_ok());
    }

    #[tokio::test]
    async fn test_every_legacy_department_resolves_to_same_name() {
        let mut products = storefront();
        products.extend([
            LegacyProduct::new(6, "Rain Jacket", "Outerwear").department("Women"),
            LegacyProduct::new(7, "Crib Sheet", "Bedding").department("kids"),
            LegacyProduct::new(8, "Beanie", "Hats").department("Kids "),
            LegacyProduct::new(9, "Gift Card", "Gifts"),
            LegacyProduct::new(10, "Mystery Box", "Misc").department(""),
        ]);
        let db = catalog_with(&products).await;

        let rows: Vec<(i64, String, Option<String>)> = sqlx::query_as(
            "SELECT p.id, p.department, d.name \
             FROM products p LEFT JOIN departments d ON d.id = p.department_id \
             WHERE p.department IS NOT NULL AND p.department != ''",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(rows.len(), 8);
        for (id, legacy, joined) in rows {
            assert_eq!(joined.as_deref(), Some(legacy.as_str()), "product {id}");
        }

        let unlinked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products \
             WHERE (department IS NULL OR department = '') AND department_id IS NOT NULL",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(unlinked, 0);
    }

    #[tokio::test]
    async fn test_rerun_is_a_no_op() {
        let db = catalog_with(&storefront()).await;
        let departments = db.departments().list().await.unwrap();
        let before = links(&db).await;

        let report = db.run_migrations().await.unwrap();

        assert_eq!(db.departments().list().await.unwrap(), departments);
        assert_eq!(links(&db).await, before);
        assert_eq!(report.department_count, 3);

        let inserted = db
            .department_migration()
            .populate_departments(&["Men".to_string(), "Women".to_string()])
            .await
            .unwrap();
        assert_eq!(inserted, 0);
    }

    #[tokio::test]
    async fn test_migrates_legacy_schema_without_department_id() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        sqlx::query(CREATE_LEGACY_PRODUCTS)
            .execute(db.pool())
            .await
            .unwrap();
        db.loader().insert_all(&storefront()).await.unwrap();

        let report = db.run_migrations().await.unwrap();
        assert_eq!(report.department_count, 3);
        assert_eq!(report.linked_products, 5);

        // Column already present now.
        let added = db
            .department_migration()
            .ensure_department_id_column()
            .await
            .unwrap();
        assert!(!added);

        let product = db.products().get_by_id(3).await.unwrap();
        assert_eq!(product.department.as_deref(), Some("Men"));
        assert_eq!(product.department_name.as_deref(), Some("Men"));
    }

    #[tokio::test]
    async fn test_extract_skips_null_and_empty() {
        let products = vec![
            LegacyProduct::new(1, "Boots", "Shoes").department("Women"),
            LegacyProduct::new(2, "Gift Card", "Gifts"),
            LegacyProduct::new(3, "Mystery Box", "Misc").department(""),
            LegacyProduct::new(4, "Loafers", "Shoes").department("Men"),
            LegacyProduct::new(5, "Sandals", "Shoes").department("Women"),
        ];
        let db = catalog_with(&products).await;

        let names = db
            .department_migration()
            .extract_unique_departments()
            .await
            .unwrap();
        assert_eq!(names, vec!["Men".to_string(), "Women".to_string()]);

        let report = db.department_migration().verify().await.unwrap();
        assert_eq!(report.linked_products, 3);
        assert!(report.is_clean());

        let unlinked = db.products().get_by_id(3).await.unwrap();
        assert_eq!(unlinked.department_id, None);
    }

    #[tokio::test]
    async fn test_populate_ignores_empty_names() {
        let db = catalog_with(&[]).await;

        let inserted = db
            .department_migration()
            .populate_departments(&[String::new(), "Kids".to_string()])
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(db.departments().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_names_match_case_sensitively() {
        let products = vec![
            LegacyProduct::new(1, "Polo", "Tops").department("Men"),
            LegacyProduct::new(2, "Chinos", "Pants").department("men"),
        ];
        let db = catalog_with(&products).await;

        let departments = db.departments().list().await.unwrap();
        let names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["Men", "men"]);
        assert!(departments.iter().all(|d| d.product_count == 1));
    }

    #[tokio::test]
    async fn test_verify_reports_orphans() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.loader().insert_all(&storefront()).await.unwrap();

        let migration = db.department_migration();
        migration
            .populate_departments(&["Men".to_string()])
            .await
            .unwrap();
        migration.backfill_product_department_id().await.unwrap();

        let report = migration.verify().await.unwrap();
        assert_eq!(report.department_count, 1);
        assert_eq!(report.linked_products, 2);
        assert_eq!(report.orphaned_products, 3);
        assert!(!report.is_clean());
        assert!(matches!(
            report.ensure_clean(),
            Err(CoreError::IntegrityFailure { orphaned: 3 })
        ));

        // Orphans stay listable with no joined department.
        let page = db.products().list_all(PageRequest::first(50)).await.unwrap();
        let orphan = page.items.iter().find(|p| p.id == 2).unwrap();
        assert_eq!(orphan.department.as_deref(), Some("Women"));
        assert_eq!(orphan.department_name, None);

        // A full run resolves them.
        let report = db.run_migrations().await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.linked_products, 5);
    }

    #[tokio::test]
    async fn test_index_is_created() {
        let db = catalog_with(&storefront()).await;
        db.department_migration()
            .ensure_department_index()
            .await
            .unwrap();

        let present: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'index' AND name = 'idx_products_department_id'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(present, 1);
    }
}
