//! # Product CSV Importer
//!
//! Loads the product export into the catalog database and links
//! departments.
//!
//! ## Usage
//! ```bash
//! # Import data/products.csv into $CATALOG_DB_PATH
//! cargo run -p catalog-db --bin import
//!
//! # Explicit paths
//! cargo run -p catalog-db --bin import -- --file ./exports/products.csv --db ./database/ecommerce.db
//! ```
//!
//! The target database must not contain products yet; delete it to
//! re-import.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use catalog_core::PageRequest;
use catalog_db::import::{import_products, read_products_from_path};
use catalog_db::{init_tracing, CatalogConfig, Database};

const DEFAULT_CSV_PATH: &str = "data/products.csv";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = CatalogConfig::load()?;
    let mut csv_path = PathBuf::from(DEFAULT_CSV_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    csv_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = config.with_database_path(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Product Catalog CSV Importer");
                println!();
                println!("Usage: import [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --file <PATH>  Product CSV (default: {})", DEFAULT_CSV_PATH);
                println!("  -d, --db <PATH>    Database file path (default: $CATALOG_DB_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("📦 Product Catalog CSV Importer");
    println!("===============================");
    println!("CSV:      {}", csv_path.display());
    println!("Database: {}", config.database_path.display());
    println!();

    if !csv_path.exists() {
        return Err(format!(
            "{} not found; place the product export there or pass --file",
            csv_path.display()
        )
        .into());
    }

    println!("Step 1: Reading CSV...");
    let start = Instant::now();
    let products = read_products_from_path(&csv_path)?;
    println!("✓ Read {} rows", products.len());

    println!();
    println!("Step 2: Preparing database...");
    let db = Database::new(config.db_config()).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping import to avoid duplicates.");
        println!("  Delete the database file to re-import.");
        db.close().await;
        return Ok(());
    }
    println!("✓ Schema ready");

    println!();
    println!("Step 3: Loading products and linking departments...");
    let summary = import_products(&db, &products).await?;
    println!(
        "✓ Inserted {} products in {:?}",
        summary.inserted,
        start.elapsed()
    );
    println!("  Departments:     {}", summary.report.department_count);
    println!("  Linked products: {}", summary.report.linked_products);
    println!("  Orphaned:        {}", summary.report.orphaned_products);

    println!();
    println!("Step 4: Verifying...");
    let sample = db.products().list_all(PageRequest::first(5)).await?;
    println!("  Total records: {}", sample.total_count);
    for product in &sample.items {
        println!(
            "  #{:<6} {:<40} {}",
            product.id,
            product.name,
            product.department_name.as_deref().unwrap_or("-"),
        );
    }

    db.close().await;

    println!();
    println!("✓ Import complete!");

    Ok(())
}
