//! Catalog domain entities and the search response shape.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::merge::Identified;
use crate::types::{DbId, Timestamp};

/// A product category. Referenced by products, never owned by them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}

/// A full product aggregate with its complete category set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub img_url: String,
    pub date: Timestamp,
    /// Ordered by id; a set so a category can never appear twice.
    pub categories: BTreeSet<Category>,
}

/// Lightweight projection produced by the summary query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub id: DbId,
    pub name: String,
}

/// Response shape for one search hit, categories inlined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryView {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub img_url: String,
    pub date: Timestamp,
    pub categories: Vec<Category>,
}

impl From<Product> for ProductSummaryView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
            categories: product.categories.into_iter().collect(),
        }
    }
}

impl Identified for Product {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Identified for ProductSummary {
    fn id(&self) -> DbId {
        self.id
    }
}
