//! Repository for the `products` and `product_categories` tables.
//!
//! Search reads take a `&mut PgConnection` so both query phases can run on
//! the same read-only transaction. CRUD writes take `&PgPool` and manage
//! their own transaction.

use catalog_core::catalog::{Product, ProductSummary};
use catalog_core::filter::FilterSpec;
use catalog_core::pagination::{Page, PageRequest, SortField, SortOrder};
use catalog_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::product::{
    assemble_products, CreateProduct, ProductCategoryRow, ProductSummaryRow, UpdateProduct,
};

/// Product columns plus one joined category, for aggregate loading.
const PRODUCT_WITH_CATEGORY_COLUMNS: &str = "\
    p.id, p.name, p.description, p.price, p.img_url, p.date, \
    c.id AS category_id, c.name AS category_name";

/// Search predicate shared by the page and count queries.
///
/// `$1` is the category id array (NULL = unrestricted), `$2` the raw name
/// substring. Pattern and column are both folded with `LOWER`. The category
/// test is a semi-join, so a product in several matching categories still
/// yields a single row.
const SEARCH_PREDICATE: &str = "\
    ($1::BIGINT[] IS NULL OR EXISTS ( \
        SELECT 1 FROM product_categories pc \
        WHERE pc.product_id = p.id AND pc.category_id = ANY($1))) \
    AND POSITION(LOWER($2) IN LOWER(p.name)) > 0";

/// Provides search reads and CRUD for products.
pub struct ProductRepo;

impl ProductRepo {
    // -----------------------------------------------------------------------
    // Search phases
    // -----------------------------------------------------------------------

    /// Phase 1: one page of distinct matching products plus the total count.
    pub async fn find_summaries(
        conn: &mut PgConnection,
        filter: &FilterSpec,
        page: &PageRequest,
    ) -> Result<Page<ProductSummary>, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.name FROM products p \
             WHERE {SEARCH_PREDICATE} \
             ORDER BY {} \
             LIMIT $3 OFFSET $4",
            order_by_clause(page.sort())
        );
        let rows = sqlx::query_as::<_, ProductSummaryRow>(&query)
            .bind(filter.category_filter())
            .bind(filter.name_pattern())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *conn)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM products p WHERE {SEARCH_PREDICATE}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(filter.category_filter())
            .bind(filter.name_pattern())
            .fetch_one(&mut *conn)
            .await?;

        let content = rows.into_iter().map(ProductSummary::from).collect();
        Ok(Page::new(content, page, total))
    }

    /// Phase 2: full products with all their categories, in one query.
    ///
    /// The result order is unspecified; ids with no product are absent.
    pub async fn find_full_by_ids(
        conn: &mut PgConnection,
        ids: &[DbId],
    ) -> Result<Vec<Product>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {PRODUCT_WITH_CATEGORY_COLUMNS} \
             FROM products p \
             LEFT JOIN product_categories pc ON pc.product_id = p.id \
             LEFT JOIN categories c ON c.id = pc.category_id \
             WHERE p.id = ANY($1)"
        );
        let rows = sqlx::query_as::<_, ProductCategoryRow>(&query)
            .bind(ids)
            .fetch_all(&mut *conn)
            .await?;
        Ok(assemble_products(rows))
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Find a product by id, with its categories.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let products = Self::find_full_by_ids(&mut conn, &[id]).await?;
        Ok(products.into_iter().next())
    }

    /// Insert a product and its category associations.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO products (name, description, price, img_url, date) \
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW())) \
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.img_url)
        .bind(input.date)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_categories_inner(&mut tx, id, &input.category_ids).await?;

        let product = Self::find_full_by_ids(&mut tx, &[id])
            .await?
            .into_iter()
            .next()
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(product)
    }

    /// Update a product. Only non-`None` fields are applied.
    ///
    /// If `category_ids` is `Some`, replaces all category associations.
    /// Returns `None` if no product with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_scalar::<_, DbId>(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 img_url = COALESCE($5, img_url), \
                 date = COALESCE($6, date) \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.img_url)
        .bind(input.date)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(ref category_ids) = input.category_ids {
            Self::set_categories_inner(&mut tx, id, category_ids).await?;
        }

        let product = Self::find_full_by_ids(&mut tx, &[id])
            .await?
            .into_iter()
            .next();

        tx.commit().await?;
        Ok(product)
    }

    /// Delete a product. Category associations cascade.
    ///
    /// Returns `true` if a product was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Replace category associations within an existing transaction.
    async fn set_categories_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        if category_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO product_categories (product_id, category_id) \
             SELECT $1::BIGINT, UNNEST($2::BIGINT[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(product_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a validated sort list as an `ORDER BY` body.
///
/// Only whitelisted columns reach the SQL text. `p.id` is always appended so
/// rows with equal names page deterministically.
fn order_by_clause(sort: &[SortOrder]) -> String {
    let mut terms: Vec<String> = sort
        .iter()
        .map(|order| {
            let column = match order.field {
                SortField::Name => "p.name",
            };
            format!("{column} {}", order.direction.as_sql())
        })
        .collect();
    terms.push("p.id ASC".to_string());
    terms.join(", ")
}
