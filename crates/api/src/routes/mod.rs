pub mod categories;
pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /products                 GET search, POST create
/// /products/{id}            GET, PUT, DELETE
/// /categories               GET list, POST create
/// /categories/{id}          GET
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/categories", categories::router())
}
