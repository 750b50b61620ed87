//! # Seed Data Generator
//!
//! Populates the catalog with legacy-shaped products for development, then
//! runs the department normalization so the seeded rows are linked.
//!
//! ## Usage
//! ```bash
//! # Generate 2,000 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 10000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Products
//! Products are spread over three departments (Men, Women, Kids) and a set
//! of apparel categories. Every 50th product has no department at all, so
//! the "unassigned" path of the listing is exercised too.
//!
//! Each product has:
//! - Sequential id starting at 1
//! - Unique SKU: `{DEPT}-{CATEGORY}-{INDEX}`
//! - Deterministic price: $9.99 - $129.99, cost 40-60% of price
//! - One of five distribution centers

use std::env;
use std::time::Instant;

use catalog_core::{LegacyProduct, PageRequest};
use catalog_db::{init_tracing, CatalogConfig, Database};

/// Departments and their category assortment.
const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Men",
        &[
            "Jeans",
            "Shorts",
            "Sweaters",
            "Outerwear & Coats",
            "Active",
            "Socks",
            "Suits & Sport Coats",
            "Underwear",
        ],
    ),
    (
        "Women",
        &[
            "Dresses",
            "Jeans",
            "Blazers & Jackets",
            "Intimates",
            "Leggings",
            "Skirts",
            "Swim",
            "Tops & Tees",
        ],
    ),
    (
        "Kids",
        &["Tops & Tees", "Jeans", "Outerwear & Coats", "Sleep & Lounge", "Active"],
    ),
];

const BRANDS: &[&str] = &[
    "Nike",
    "Levi's",
    "Adidas",
    "Calvin Klein",
    "Columbia",
    "Carhartt",
    "Hanes",
    "Patagonia",
    "Tommy Hilfiger",
    "Under Armour",
];

const STYLES: &[&str] = &["Classic", "Slim Fit", "Relaxed", "Vintage", "Performance"];

const DISTRIBUTION_CENTERS: i64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = CatalogConfig::load()?;
    let mut count: usize = 2000;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                count = match parse_count(args.get(i + 1).map(String::as_str)) {
                    Ok(count) => count,
                    Err(message) => {
                        eprintln!("error: {}", message);
                        eprintln!("Run with --help for usage.");
                        std::process::exit(2);
                    }
                };
                i += 1;
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = config.with_database_path(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Product Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 2000)");
                println!("  -d, --db <PATH>    Database file path (default: $CATALOG_DB_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Product Catalog Seed Data Generator");
    println!("======================================");
    println!("Database: {}", config.database_path.display());
    println!("Products: {}", count);
    println!();

    let db = Database::new(config.db_config()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = Instant::now();
    let products: Vec<LegacyProduct> = (0..count).map(generate_product).collect();
    let inserted = db.loader().insert_all(&products).await?;

    let elapsed = start.elapsed();
    println!("✓ Inserted {} products in {:?}", inserted, elapsed);

    println!();
    println!("Linking departments...");
    let report = db.run_migrations().await?;
    println!("  Departments:     {}", report.department_count);
    println!("  Linked products: {}", report.linked_products);
    println!("  Orphaned:        {}", report.orphaned_products);

    println!();
    println!("Verifying search...");
    let sample = PageRequest::first(10);
    let hits = db.products().search("jeans", sample).await?;
    println!("  Search 'jeans': {} results", hits.total_count);

    let hits = db.products().search("nike", sample).await?;
    println!("  Search 'nike': {} results", hits.total_count);

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Parses the value following `--count`.
fn parse_count(raw: Option<&str>) -> Result<usize, String> {
    let raw = raw.ok_or_else(|| "--count requires a value".to_string())?;
    match raw.parse::<usize>() {
        Ok(0) => Err("--count must be at least 1".to_string()),
        Ok(count) => Ok(count),
        Err(_) => Err(format!("invalid --count value '{}'", raw)),
    }
}

/// Generates the `index`-th product deterministically.
fn generate_product(index: usize) -> LegacyProduct {
    let id = index as i64 + 1;

    let (department, categories) = DEPARTMENTS[index % DEPARTMENTS.len()];
    let category = categories[(index / DEPARTMENTS.len()) % categories.len()];
    let brand = BRANDS[(index * 7) % BRANDS.len()];
    let style = STYLES[(index / 3) % STYLES.len()];

    let name = format!("{} {} {}", brand, style, category);

    // $9.99 - $129.99
    let retail_price = 9.99 + ((index * 37) % 121) as f64;
    // 40-60% of price
    let cost = (retail_price * (40 + (index % 21)) as f64).round() / 100.0;

    let category_code: String = category
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let department_code = department[..1].to_uppercase();
    let sku = format!("{}-{}-{:05}", department_code, category_code, id);

    let product = LegacyProduct::new(id, name, category)
        .brand(brand)
        .sku(sku)
        .pricing(retail_price, cost)
        .distribution_center(id % DISTRIBUTION_CENTERS + 1);

    if index % 50 == 49 {
        product
    } else {
        product.department(department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("250")), Ok(250));
        assert!(parse_count(Some("many")).is_err());
        assert!(parse_count(Some("-5")).is_err());
        assert!(parse_count(Some("0")).is_err());
        assert!(parse_count(None).is_err());
    }

    #[test]
    fn test_generated_products_are_unique_and_mostly_assigned() {
        let products: Vec<LegacyProduct> = (0..100).map(generate_product).collect();

        let mut ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 100);

        let unassigned = products.iter().filter(|p| p.department.is_none()).count();
        assert_eq!(unassigned, 2);
    }
}
