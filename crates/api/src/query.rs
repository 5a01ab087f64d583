//! Query parameter types for API handlers.

use catalog_core::filter::UNSET_CATEGORY;
use serde::Deserialize;

/// Query parameters for `GET /api/v1/products`.
///
/// `name` and `categoryId` are passed through raw; the filter builder owns
/// their grammar. Paging values are validated by `PageRequest::from_params`.
#[derive(Debug, Deserialize)]
pub struct ProductSearchParams {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "categoryId", default = "unset_category")]
    pub category_id: String,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

fn unset_category() -> String {
    UNSET_CATEGORY.to_string()
}
