//! # Product Repository
//!
//! The catalog's read path over `products LEFT JOIN departments`.
//!
//! ## Key Operations
//! - Paginated listing of every product
//! - Substring search across product and department columns
//! - Department-filtered listing
//! - Lookup by id
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Search Works                                     │
//! │                                                                         │
//! │  User types: "jeans"                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Escape LIKE wildcards, wrap: "%jeans%"                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Match against: p.name, p.category, p.brand, d.name (joined)           │
//! │  ┌───────────────────────────────────────────────────────┐             │
//! │  │ Nike Running Shoes  | Shoes   | Nike   | Men          │             │
//! │  │ Levi's Jeans        | Jeans   | Levi's | Men          │ ← MATCH!    │
//! │  │ Adidas T-Shirt      | Tops    | Adidas | Women        │             │
//! │  └───────────────────────────────────────────────────────┘             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results ordered by id, paginated, with the filtered total_count       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The legacy `department` string is returned but never searched; department
//! matches go through the joined name.

use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use tracing::debug;

use catalog_core::{CatalogProduct, Page, PageRequest};

use super::{
    fetch_product_page, product_from_row, ProductFilter, ProductOrder, PRODUCT_COLUMNS,
    PRODUCT_FROM,
};
use crate::error::{DbError, DbResult};

/// Repository for product queries.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let first = repo.list_all(PageRequest::new(1, 50)?).await?;
/// let hits = repo.search("jeans", PageRequest::new(1, 20)?).await?;
/// let product = repo.get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, department or not, ordered by id.
    pub async fn list_all(&self, request: PageRequest) -> DbResult<Page<CatalogProduct>> {
        debug!(
            page = request.page(),
            page_size = request.page_size(),
            "Listing products"
        );

        let (items, total) = self.page(&ProductFilter::All, request).await?;

        debug!(count = items.len(), total, "Listed products");
        Ok(Page::new(items, total, request))
    }

    /// Searches products by case-insensitive substring.
    ///
    /// ## Matching
    /// `term` is matched literally (`%` and `_` are not wildcards) against
    /// product name, category, brand and the joined department name.
    ///
    /// Case folding is SQLite's `LIKE`: ASCII letters only. `"émile"` does
    /// not match `"Émile"`; non-ASCII text matches only with exact case.
    ///
    /// ## Returns
    /// A page echoing `search_term`. A term that matches nothing yields
    /// `total_count = 0` and no items, not an error.
    pub async fn search(&self, term: &str, request: PageRequest) -> DbResult<Page<CatalogProduct>> {
        debug!(
            term = %term,
            page = request.page(),
            page_size = request.page_size(),
            "Searching products"
        );

        let (items, total) = self.page(&ProductFilter::search(term), request).await?;

        debug!(count = items.len(), total, "Search returned products");
        Ok(Page::new(items, total, request).with_search_term(term))
    }

    /// Lists the products linked to a department, ordered by id.
    ///
    /// An unknown `department_id` is not an error: the page is empty with
    /// `total_count = 0`. Use
    /// [`DepartmentRepository::detail`](crate::DepartmentRepository::detail)
    /// when the department itself must exist.
    pub async fn list_by_department(
        &self,
        department_id: i64,
        request: PageRequest,
    ) -> DbResult<Page<CatalogProduct>> {
        debug!(
            department_id,
            page = request.page(),
            page_size = request.page_size(),
            "Listing products by department"
        );

        let filter = ProductFilter::Department { department_id };
        let (items, total) = self.page(&filter, request).await?;

        debug!(count = items.len(), total, "Listed department products");
        Ok(Page::new(items, total, request).with_department_id(department_id))
    }

    /// Gets a product (joined with its department) by id.
    ///
    /// ## Returns
    /// * `Ok(CatalogProduct)` - Product found
    /// * `Err(DbError::NotFound)` - No product with this id
    pub async fn get_by_id(&self, id: i64) -> DbResult<CatalogProduct> {
        debug!(id, "Getting product");

        let sql = format!("SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} WHERE p.id = ?1");

        let product = sqlx::query(&sql)
            .bind(id)
            .try_map(|row: SqliteRow| product_from_row(&row))
            .fetch_optional(&self.pool)
            .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts all products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Runs count + fetch inside one read transaction.
    async fn page(
        &self,
        filter: &ProductFilter,
        request: PageRequest,
    ) -> DbResult<(Vec<CatalogProduct>, i64)> {
        let mut tx = self.pool.begin().await?;
        let result = fetch_product_page(&mut tx, filter, ProductOrder::Id, request).await?;
        tx.commit().await?;
        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use catalog_core::PageRequest;

    use crate::test_support::{catalog_with, numbered, storefront};

    fn names(page: &catalog_core::Page<catalog_core::CatalogProduct>) -> Vec<&str> {
        page.items.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_matches_name_and_category() {
        let db = catalog_with(&storefront()).await;
        let repo = db.products();

        let nike = repo.search("Nike", PageRequest::first(50)).await.unwrap();
        assert_eq!(nike.total_count, 1);
        assert_eq!(names(&nike), vec!["Nike Running Shoes"]);
        assert_eq!(nike.search_term.as_deref(), Some("Nike"));

        let jeans = repo.search("Jeans", PageRequest::first(50)).await.unwrap();
        assert_eq!(jeans.total_count, 1);
        assert_eq!(names(&jeans), vec!["Levi's Jeans"]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let db = catalog_with(&storefront()).await;

        let page = db
            .products()
            .search("case", PageRequest::first(50))
            .await
            .unwrap();

        assert_eq!(names(&page), vec!["Apple iPhone Case", "Samsung Galaxy Case"]);
    }

    #[tokio::test]
    async fn test_search_folds_ascii_case_only() {
        let mut products = storefront();
        products.push(
            catalog_core::LegacyProduct::new(6, "Émile Jacket", "Outerwear").department("Women"),
        );
        let db = catalog_with(&products).await;
        let repo = db.products();

        let exact = repo.search("Émile", PageRequest::first(50)).await.unwrap();
        assert_eq!(names(&exact), vec!["Émile Jacket"]);

        let ascii_folded = repo.search("JACKET", PageRequest::first(50)).await.unwrap();
        assert_eq!(ascii_folded.total_count, 1);

        let lowered = repo.search("émile", PageRequest::first(50)).await.unwrap();
        assert_eq!(lowered.total_count, 0);
    }

    #[tokio::test]
    async fn test_search_matches_joined_department_name() {
        let db = catalog_with(&storefront()).await;

        let page = db
            .products()
            .search("electronics", PageRequest::first(50))
            .await
            .unwrap();

        assert_eq!(page.total_count, 2);
        assert!(page
            .items
            .iter()
            .all(|p| p.department_name.as_deref() == Some("Electronics")));
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let mut products = storefront();
        products.push(
            catalog_core::LegacyProduct::new(6, "100% Cotton Tee", "Tops").department("Women"),
        );
        let db = catalog_with(&products).await;
        let repo = db.products();

        let percent = repo.search("%", PageRequest::first(50)).await.unwrap();
        assert_eq!(names(&percent), vec!["100% Cotton Tee"]);

        let underscore = repo.search("_", PageRequest::first(50)).await.unwrap();
        assert_eq!(underscore.total_count, 0);
        assert!(underscore.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_match_is_empty_not_error() {
        let db = catalog_with(&storefront()).await;

        let page = db
            .products()
            .search("toaster", PageRequest::first(50))
            .await
            .unwrap();

        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_search_rows_match_list_rows() {
        let db = catalog_with(&storefront()).await;
        let repo = db.products();

        let listed = repo.list_all(PageRequest::first(50)).await.unwrap();
        let found = repo.search("Levi", PageRequest::first(50)).await.unwrap();

        let from_list = listed.items.iter().find(|p| p.id == 3).unwrap();
        assert_eq!(&found.items[0], from_list);
    }

    #[tokio::test]
    async fn test_list_all_paginates_by_id() {
        let db = catalog_with(&numbered(15)).await;
        let repo = db.products();

        let first = repo.list_all(PageRequest::new(1, 5).unwrap()).await.unwrap();
        let ids: Vec<i64> = first.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(first.total_count, 15);
        assert_eq!(first.total_pages, 3);

        let third = repo.list_all(PageRequest::new(3, 5).unwrap()).await.unwrap();
        let ids: Vec<i64> = third.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![11, 12, 13, 14, 15]);

        let past_end = repo.list_all(PageRequest::new(4, 5).unwrap()).await.unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_count, 15);
        assert_eq!(past_end.page, 4);
    }

    #[tokio::test]
    async fn test_list_all_partial_last_page() {
        let db = catalog_with(&numbered(12)).await;

        let page = db
            .products()
            .list_all(PageRequest::new(3, 5).unwrap())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_list_all_on_empty_table() {
        let db = catalog_with(&[]).await;

        let page = db.products().list_all(PageRequest::first(50)).await.unwrap();

        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_includes_products_without_department() {
        let mut products = storefront();
        products.push(catalog_core::LegacyProduct::new(6, "Gift Card", "Gifts"));
        let db = catalog_with(&products).await;

        let page = db.products().list_all(PageRequest::first(50)).await.unwrap();
        let gift = page.items.iter().find(|p| p.id == 6).unwrap();

        assert_eq!(page.total_count, 6);
        assert_eq!(gift.department, None);
        assert_eq!(gift.department_id, None);
        assert_eq!(gift.department_name, None);
    }

    #[tokio::test]
    async fn test_list_by_department() {
        let db = catalog_with(&storefront()).await;
        let men = db.departments().list().await.unwrap();
        let men = men.iter().find(|d| d.name == "Men").unwrap();

        let page = db
            .products()
            .list_by_department(men.id, PageRequest::first(50))
            .await
            .unwrap();

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(page.department_id, Some(men.id));
    }

    #[tokio::test]
    async fn test_list_by_unknown_department_is_empty() {
        let db = catalog_with(&storefront()).await;

        let page = db
            .products()
            .list_by_department(999, PageRequest::first(50))
            .await
            .unwrap();

        assert_eq!(page.total_count, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.department_id, Some(999));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = catalog_with(&storefront()).await;

        let product = db.products().get_by_id(5).await.unwrap();
        let department = db
            .departments()
            .get_by_id(product.department_id.unwrap())
            .await
            .unwrap();

        assert_eq!(product.name, "Samsung Galaxy Case");
        assert_eq!(product.distribution_center_id, Some(3));
        assert_eq!(product.department.as_deref(), Some("Electronics"));
        assert_eq!(product.department_name, Some(department.name));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = catalog_with(&storefront()).await;

        let err = db.products().get_by_id(42).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(!err.is_storage_failure());
    }

    #[tokio::test]
    async fn test_count() {
        let db = catalog_with(&numbered(7)).await;

        assert_eq!(db.products().count().await.unwrap(), 7);
    }
}
