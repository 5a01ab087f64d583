use std::sync::Arc;

use catalog_core::search::ProductSearch;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: catalog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Two-phase product search over the same pool.
    pub search: ProductSearch,
}

impl AppState {
    /// Build state whose search service reads through `pool`.
    pub fn new(pool: catalog_db::DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(catalog_db::PgCatalogStore::new(pool.clone()));
        let search = ProductSearch::new(store, config.stale_page_policy);
        Self {
            pool,
            config: Arc::new(config),
            search,
        }
    }
}
