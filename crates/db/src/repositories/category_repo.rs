//! Repository for the `categories` table.

use catalog_core::catalog::Category;
use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{CategoryRow, CreateCategory};

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!("INSERT INTO categories (name) VALUES ($1) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, CategoryRow>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        let row = sqlx::query_as::<_, CategoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Category::from))
    }

    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name, id");
        let rows = sqlx::query_as::<_, CategoryRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Return the subset of `ids` that do not exist, sorted ascending.
    pub async fn find_missing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT wanted.id \
             FROM UNNEST($1::BIGINT[]) AS wanted(id) \
             WHERE NOT EXISTS (SELECT 1 FROM categories c WHERE c.id = wanted.id) \
             ORDER BY wanted.id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
