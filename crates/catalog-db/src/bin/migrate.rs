//! # Department Migration Runner
//!
//! Normalizes the legacy `products.department` strings into the
//! `departments` table and verifies the result.
//!
//! ## Usage
//! ```bash
//! # Migrate the database at $CATALOG_DB_PATH
//! cargo run -p catalog-db --bin migrate
//!
//! # Explicit path, machine-readable report
//! cargo run -p catalog-db --bin migrate -- --db ./database/ecommerce.db --json
//! ```
//!
//! ## Exit Status
//! - `0` - Every product with a legacy department is linked
//! - `1` - Orphaned products remain (report still printed)
//! - `2` - Configuration, connection or query failure

use std::env;
use std::process::ExitCode;

use catalog_core::{CatalogProduct, MigrationReport, PageRequest};
use catalog_db::{init_tracing, CatalogConfig, Database};
use serde::Serialize;
use tracing::error;

const SAMPLE_SIZE: u32 = 5;

/// Report shape for `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    database: String,
    report: &'a MigrationReport,
    clean: bool,
    sample: &'a [CatalogProduct],
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "Department migration failed");
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<MigrationReport, Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config = CatalogConfig::load()?;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = config.with_database_path(&args[i + 1]);
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Product Catalog Department Migration");
                println!();
                println!("Usage: migrate [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $CATALOG_DB_PATH)");
                println!("      --json         Print the report as JSON");
                println!("  -h, --help         Show this help message");
                return Ok(MigrationReport::default());
            }
            _ => {}
        }
        i += 1;
    }

    // Migrations are run explicitly below so the report can be captured.
    let db = Database::new(config.db_config().run_migrations(false)).await?;
    let report = db.run_migrations().await?;

    let sample = db
        .products()
        .list_all(PageRequest::first(SAMPLE_SIZE))
        .await?
        .items;

    db.close().await;

    if json {
        let output = JsonOutput {
            database: config.database_path.display().to_string(),
            report: &report,
            clean: report.is_clean(),
            sample: &sample,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(report);
    }

    println!("🗂  Department Migration");
    println!("========================");
    println!("Database: {}", config.database_path.display());
    println!();
    println!("  Departments:     {}", report.department_count);
    println!("  Linked products: {}", report.linked_products);
    println!("  Orphaned:        {}", report.orphaned_products);
    println!();

    if sample.is_empty() {
        println!("No products in catalog.");
    } else {
        println!("Sample products:");
        for product in &sample {
            println!(
                "  #{:<6} {:<40} {:<12} -> {}",
                product.id,
                product.name,
                product.department.as_deref().unwrap_or("-"),
                product.department_name.as_deref().unwrap_or("(unlinked)"),
            );
        }
    }

    println!();
    match report.ensure_clean() {
        Ok(()) => println!("✓ Migration complete"),
        Err(e) => println!("⚠ {}", e),
    }

    Ok(report)
}
