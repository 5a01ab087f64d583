//! PostgreSQL implementation of the catalog search store.
//!
//! Each snapshot is a `REPEATABLE READ, READ ONLY` transaction, so the
//! summary query and the enrichment fetch see the same committed state.
//! Dropping an unfinished snapshot rolls the transaction back.

use async_trait::async_trait;
use catalog_core::catalog::{Product, ProductSummary};
use catalog_core::error::CoreError;
use catalog_core::filter::FilterSpec;
use catalog_core::pagination::{Page, PageRequest};
use catalog_core::store::{CatalogSnapshot, CatalogStore};
use catalog_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::repositories::ProductRepo;

/// [`CatalogStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn read_snapshot(&self) -> Result<Box<dyn CatalogSnapshot>, CoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        Ok(Box::new(PgSnapshot { tx }))
    }
}

/// One read-only transaction spanning both search phases.
struct PgSnapshot {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CatalogSnapshot for PgSnapshot {
    async fn find_summaries(
        &mut self,
        filter: &FilterSpec,
        page: &PageRequest,
    ) -> Result<Page<ProductSummary>, CoreError> {
        ProductRepo::find_summaries(&mut self.tx, filter, page)
            .await
            .map_err(store_error)
    }

    async fn find_full_by_ids(&mut self, ids: &[DbId]) -> Result<Vec<Product>, CoreError> {
        ProductRepo::find_full_by_ids(&mut self.tx, ids)
            .await
            .map_err(store_error)
    }

    async fn finish(self: Box<Self>) -> Result<(), CoreError> {
        // Nothing was written; commit just ends the transaction.
        self.tx.commit().await.map_err(store_error)
    }
}

/// Map a sqlx error onto the domain error at the store seam.
///
/// Connection-level failures are transient and become
/// [`CoreError::Unavailable`]; anything else is an internal error.
pub fn store_error(err: sqlx::Error) -> CoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            tracing::warn!(error = %err, "Catalog store unavailable");
            CoreError::Unavailable(err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Catalog store query failed");
            CoreError::Internal(other.to_string())
        }
    }
}
