//! Handlers for product search and product CRUD.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::pagination::PageRequest;
use catalog_core::types::DbId;
use catalog_core::validation::{validate_price, validate_product_name};
use catalog_db::models::product::{CreateProduct, UpdateProduct};
use catalog_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::query::ProductSearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/v1/products
///
/// Search products by name substring and category list, one page at a time.
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<ProductSearchParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query?;
    let request = PageRequest::from_params(params.page, params.size, params.sort.as_deref())?;

    let page = state
        .search
        .search(&params.name, &params.category_id, &request)
        .await?;

    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, product_id)
        .await?
        .ok_or(not_found(product_id))?;

    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProduct>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    validate_product_name(&input.name)?;
    validate_price(input.price)?;
    ensure_categories_exist(&state, &input.category_ids).await?;

    let product = ProductRepo::create(&state.pool, &input).await?;

    tracing::info!(
        product_id = product.id,
        categories = product.categories.len(),
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/products/{id}
///
/// Apply the fields present in the body. `categoryIds`, when present,
/// replaces the whole category set.
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    body: Result<Json<UpdateProduct>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    if let Some(name) = &input.name {
        validate_product_name(name)?;
    }
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    if let Some(category_ids) = &input.category_ids {
        ensure_categories_exist(&state, category_ids).await?;
    }

    let product = ProductRepo::update(&state.pool, product_id, &input)
        .await?
        .ok_or(not_found(product_id))?;

    tracing::info!(product_id, "Product updated");

    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ProductRepo::delete(&state.pool, product_id).await? {
        tracing::info!(product_id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(product_id))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

async fn ensure_categories_exist(state: &AppState, category_ids: &[DbId]) -> AppResult<()> {
    let missing = CategoryRepo::find_missing_ids(&state.pool, category_ids).await?;
    if missing.is_empty() {
        return Ok(());
    }
    let list = missing
        .iter()
        .map(DbId::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(CoreError::Validation(format!("Unknown category id(s): {list}")).into())
}
