//! Fixtures shared by the in-crate tests.

use catalog_core::LegacyProduct;

use crate::pool::{Database, DbConfig};

/// Opens a migrated in-memory catalog holding `products`, departments
/// already normalized.
pub(crate) async fn catalog_with(products: &[LegacyProduct]) -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.loader().insert_all(products).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

/// Five products across three departments.
pub(crate) fn storefront() -> Vec<LegacyProduct> {
    vec![
        LegacyProduct::new(1, "Nike Running Shoes", "Shoes")
            .brand("Nike")
            .department("Men")
            .sku("NK-001")
            .pricing(89.99, 40.0),
        LegacyProduct::new(2, "Adidas T-Shirt", "Tops")
            .brand("Adidas")
            .department("Women")
            .pricing(24.99, 9.5),
        LegacyProduct::new(3, "Levi's Jeans", "Jeans")
            .brand("Levi's")
            .department("Men")
            .pricing(59.99, 22.0),
        LegacyProduct::new(4, "Apple iPhone Case", "Accessories")
            .brand("Apple")
            .department("Electronics"),
        LegacyProduct::new(5, "Samsung Galaxy Case", "Accessories")
            .brand("Samsung")
            .department("Electronics")
            .distribution_center(3),
    ]
}

/// `count` products with ids `1..=count`, all in one department.
pub(crate) fn numbered(count: i64) -> Vec<LegacyProduct> {
    (1..=count)
        .map(|id| {
            LegacyProduct::new(id, format!("Product {id:02}"), "General")
                .brand("Acme")
                .department("Home")
        })
        .collect()
}
