//! Product rows, DTOs, and aggregate assembly.

use std::collections::{BTreeSet, HashMap};

use catalog_core::catalog::{Category, Product, ProductSummary};
use catalog_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// `id, name` projection used by the summary query.
#[derive(Debug, Clone, FromRow)]
pub struct ProductSummaryRow {
    pub id: DbId,
    pub name: String,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        ProductSummary {
            id: row.id,
            name: row.name,
        }
    }
}

/// One product joined with at most one of its categories.
///
/// A product with `k` categories yields `k` rows; a product with none
/// yields one row with NULL category columns.
#[derive(Debug, Clone, FromRow)]
pub struct ProductCategoryRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub date: Timestamp,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
}

/// Fold joined rows into one [`Product`] per id.
///
/// The output order is unspecified.
pub fn assemble_products(rows: Vec<ProductCategoryRow>) -> Vec<Product> {
    let mut by_id: HashMap<DbId, Product> = HashMap::new();
    for row in rows {
        let product = by_id.entry(row.id).or_insert_with(|| Product {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            price: row.price,
            img_url: row.img_url.clone(),
            date: row.date,
            categories: BTreeSet::new(),
        });
        if let (Some(id), Some(name)) = (row.category_id, row.category_name) {
            product.categories.insert(Category { id, name });
        }
    }
    by_id.into_values().collect()
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub img_url: String,
    /// Defaults to the insertion time.
    pub date: Option<Timestamp>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
}

/// DTO for updating a product. Only non-`None` fields are applied.
///
/// `category_ids`, when present, replaces the whole category set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub img_url: Option<String>,
    pub date: Option<Timestamp>,
    pub category_ids: Option<Vec<DbId>>,
}
