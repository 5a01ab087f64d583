//! Storage seam for product search.
//!
//! The search pipeline needs exactly two reads, and both must observe the
//! same state of the store. A [`CatalogStore`] hands out a
//! [`CatalogSnapshot`] that runs both reads against one consistent view and
//! is released with [`CatalogSnapshot::finish`]. Dropping a snapshot without
//! finishing it (for example when the request future is cancelled) must
//! release it as well.

use async_trait::async_trait;

use crate::catalog::{Product, ProductSummary};
use crate::error::CoreError;
use crate::filter::FilterSpec;
use crate::pagination::{Page, PageRequest};
use crate::types::DbId;

/// Source of read snapshots over the product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Open a read-only snapshot. Fails with [`CoreError::Unavailable`] if
    /// the store cannot be reached.
    async fn read_snapshot(&self) -> Result<Box<dyn CatalogSnapshot>, CoreError>;
}

/// A consistent, read-only view of the catalog.
#[async_trait]
pub trait CatalogSnapshot: Send {
    /// Distinct products matching `filter`, ordered and sliced per `page`.
    ///
    /// A product that belongs to several matching categories appears once.
    /// The page's total counts the whole distinct match set.
    async fn find_summaries(
        &mut self,
        filter: &FilterSpec,
        page: &PageRequest,
    ) -> Result<Page<ProductSummary>, CoreError>;

    /// Full products with their categories for the given ids, in any order.
    ///
    /// Ids with no product are silently absent from the result.
    async fn find_full_by_ids(&mut self, ids: &[DbId]) -> Result<Vec<Product>, CoreError>;

    /// Release the snapshot.
    async fn finish(self: Box<Self>) -> Result<(), CoreError>;
}
