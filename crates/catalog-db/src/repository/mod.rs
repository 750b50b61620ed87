//! # Repository Module
//!
//! Query engine for the catalog.
//!
//! ## Count/Fetch Pairing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Listing Request                                  │
//! │                                                                         │
//! │  ProductFilter ──► where_clause()  (single source of WHERE/JOIN)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN (read transaction on one pooled connection)                     │
//! │       │                                                                 │
//! │       ├── SELECT COUNT(*)  FROM products p LEFT JOIN departments d     │
//! │       │                    <same WHERE>                                │
//! │       │                                                                 │
//! │       ├── SELECT <columns> FROM products p LEFT JOIN departments d     │
//! │       │                    <same WHERE> ORDER BY .. LIMIT .. OFFSET .. │
//! │       ▼                                                                 │
//! │  COMMIT / drop → connection returned to the pool                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Page { items, total_count, page, page_size, total_pages }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - list, search,
//!   department filter, lookup by id
//! - [`DepartmentRepository`](department::DepartmentRepository) - departments
//!   with product counts, detail lookup, department product listing

pub mod department;
pub mod product;

use sqlx::query::{Query, QueryScalar};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection};

use catalog_core::{CatalogProduct, PageRequest};

use crate::error::DbResult;

/// Columns of the joined product row, in [`CatalogProduct`] field order.
///
/// `department_id`/`department_name` come from the joined department, not
/// from `products.department_id`, so an unlinked product yields `NULL` for
/// both.
pub(crate) const PRODUCT_COLUMNS: &str = r#"
    p.id,
    p.name,
    p.category,
    p.brand,
    p.retail_price,
    p.cost,
    p.department,
    p.sku,
    p.distribution_center_id,
    d.id   AS department_id,
    d.name AS department_name
"#;

/// Left join so products without a department still appear.
pub(crate) const PRODUCT_FROM: &str =
    "FROM products p LEFT JOIN departments d ON p.department_id = d.id";

/// Which products a listing covers.
#[derive(Debug, Clone)]
pub(crate) enum ProductFilter {
    All,
    /// Case-insensitive substring match; holds the escaped LIKE pattern.
    Search { pattern: String },
    Department { department_id: i64 },
}

impl ProductFilter {
    /// Builds a search filter matching `term` literally anywhere in the
    /// searched columns.
    pub(crate) fn search(term: &str) -> Self {
        ProductFilter::Search {
            pattern: format!("%{}%", escape_like(term)),
        }
    }

    fn where_clause(&self) -> &'static str {
        match self {
            ProductFilter::All => "",
            // SQLite LIKE is case-insensitive for ASCII letters.
            ProductFilter::Search { .. } => {
                r"WHERE p.name LIKE ?1 ESCAPE '\'
                     OR p.category LIKE ?1 ESCAPE '\'
                     OR p.brand LIKE ?1 ESCAPE '\'
                     OR d.name LIKE ?1 ESCAPE '\'"
            }
            ProductFilter::Department { .. } => "WHERE p.department_id = ?1",
        }
    }

    /// Number of `?N` placeholders used by `where_clause`.
    fn param_count(&self) -> usize {
        match self {
            ProductFilter::All => 0,
            ProductFilter::Search { .. } | ProductFilter::Department { .. } => 1,
        }
    }

    fn bind_query<'q>(
        &'q self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            ProductFilter::All => query,
            ProductFilter::Search { pattern } => query.bind(pattern.as_str()),
            ProductFilter::Department { department_id } => query.bind(*department_id),
        }
    }

    fn bind_scalar<'q>(
        &'q self,
        query: QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>,
    ) -> QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>> {
        match self {
            ProductFilter::All => query,
            ProductFilter::Search { pattern } => query.bind(pattern.as_str()),
            ProductFilter::Department { department_id } => query.bind(*department_id),
        }
    }
}

/// Ordering of a listing. Both end on `p.id` so pages are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProductOrder {
    Id,
    NameThenId,
}

impl ProductOrder {
    fn order_by(self) -> &'static str {
        match self {
            ProductOrder::Id => "ORDER BY p.id",
            ProductOrder::NameThenId => "ORDER BY p.name, p.id",
        }
    }
}

/// Escapes LIKE wildcards so the term is matched literally (escape char `\`).
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Counts the rows matched by `filter`.
pub(crate) async fn count_products(
    conn: &mut SqliteConnection,
    filter: &ProductFilter,
) -> DbResult<i64> {
    let sql = format!("SELECT COUNT(*) {PRODUCT_FROM} {}", filter.where_clause());

    let total = filter
        .bind_scalar(sqlx::query_scalar::<Sqlite, i64>(&sql))
        .fetch_one(&mut *conn)
        .await?;

    Ok(total)
}

/// Fetches one page of rows matched by `filter`.
///
/// `request` is `None` for unpaginated listings (department detail).
pub(crate) async fn fetch_products(
    conn: &mut SqliteConnection,
    filter: &ProductFilter,
    order: ProductOrder,
    request: Option<PageRequest>,
) -> DbResult<Vec<CatalogProduct>> {
    let limit_clause = match request {
        Some(_) => {
            let next = filter.param_count() + 1;
            format!("LIMIT ?{} OFFSET ?{}", next, next + 1)
        }
        None => String::new(),
    };

    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} {} {} {}",
        filter.where_clause(),
        order.order_by(),
        limit_clause
    );

    let mut query = filter.bind_query(sqlx::query::<Sqlite>(&sql));
    if let Some(request) = request {
        query = query.bind(request.limit()).bind(request.offset());
    }

    let products = query
        .try_map(|row: SqliteRow| product_from_row(&row))
        .fetch_all(&mut *conn)
        .await?;

    Ok(products)
}

/// Count and page fetch for one filter, on one connection.
///
/// The caller owns the transaction so both statements see one snapshot.
pub(crate) async fn fetch_product_page(
    conn: &mut SqliteConnection,
    filter: &ProductFilter,
    order: ProductOrder,
    request: PageRequest,
) -> DbResult<(Vec<CatalogProduct>, i64)> {
    let total = count_products(conn, filter).await?;

    // Past the end: skip the fetch, the count still stands.
    if request.offset() >= total {
        return Ok((Vec::new(), total));
    }

    let items = fetch_products(conn, filter, order, Some(request)).await?;
    Ok((items, total))
}

/// Builds a [`CatalogProduct`] field by field from a joined row.
pub(crate) fn product_from_row(row: &SqliteRow) -> Result<CatalogProduct, sqlx::Error> {
    Ok(CatalogProduct {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        brand: row.try_get("brand")?,
        retail_price: row.try_get("retail_price")?,
        cost: row.try_get("cost")?,
        department: row.try_get("department")?,
        sku: row.try_get("sku")?,
        distribution_center_id: row.try_get("distribution_center_id")?,
        department_id: row.try_get("department_id")?,
        department_name: row.try_get("department_name")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("nike"), "nike");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
    }

    #[test]
    fn test_search_pattern() {
        match ProductFilter::search("50%") {
            ProductFilter::Search { pattern } => assert_eq!(pattern, "%50\\%%"),
            other => panic!("unexpected filter: {other:?}"),
        }
    }

    #[test]
    fn test_placeholders_follow_filter_params() {
        assert_eq!(ProductFilter::All.param_count(), 0);
        assert!(ProductFilter::All.where_clause().is_empty());
        assert_eq!(ProductFilter::search("x").param_count(), 1);
        assert!(ProductFilter::search("x").where_clause().contains("?1"));
        assert_eq!(
            ProductFilter::Department { department_id: 1 }.param_count(),
            1
        );
    }
}
