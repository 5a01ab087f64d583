//! Two-phase product search.
//!
//! Phase 1 pages distinct product ids (plus names) matching the filter.
//! Phase 2 fetches the full aggregates for just those ids. Both run inside
//! one read snapshot, then the aggregates are put back into phase 1 order
//! and wrapped with phase 1's page metadata.

use std::sync::Arc;

use crate::catalog::ProductSummaryView;
use crate::error::CoreError;
use crate::filter::FilterSpec;
use crate::merge::{restore_order, MissingPolicy};
use crate::pagination::{Page, PageRequest};
use crate::store::CatalogStore;
use crate::types::DbId;

/// Product search service. Cheap to clone.
#[derive(Clone)]
pub struct ProductSearch {
    store: Arc<dyn CatalogStore>,
    missing_policy: MissingPolicy,
}

impl ProductSearch {
    pub fn new(store: Arc<dyn CatalogStore>, missing_policy: MissingPolicy) -> Self {
        Self {
            store,
            missing_policy,
        }
    }

    /// Search by raw `name` and `categoryId` parameters.
    ///
    /// An invalid category list is rejected before the store is touched.
    pub async fn search(
        &self,
        name: &str,
        category_csv: &str,
        page: &PageRequest,
    ) -> Result<Page<ProductSummaryView>, CoreError> {
        let filter = FilterSpec::parse(name, category_csv)?;
        self.search_filtered(&filter, page).await
    }

    /// Search with an already-built filter.
    pub async fn search_filtered(
        &self,
        filter: &FilterSpec,
        page: &PageRequest,
    ) -> Result<Page<ProductSummaryView>, CoreError> {
        let mut snapshot = self.store.read_snapshot().await?;

        let summaries = snapshot.find_summaries(filter, page).await?;
        let products = if summaries.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<DbId> = summaries.content().iter().map(|s| s.id).collect();
            snapshot.find_full_by_ids(&ids).await?
        };

        snapshot.finish().await?;

        let merged = match restore_order(summaries.content(), products, self.missing_policy) {
            Ok(merged) => merged,
            Err(err) => {
                tracing::warn!(page = summaries.page_number(), error = %err, "Rejecting stale product page");
                return Err(err);
            }
        };
        if !merged.missing.is_empty() {
            tracing::warn!(
                page = summaries.page_number(),
                missing = ?merged.missing,
                "Products vanished between query phases, dropping them from the page"
            );
        }

        tracing::debug!(
            total = summaries.total_elements(),
            returned = merged.items.len(),
            "Product search completed"
        );

        let content = merged
            .items
            .into_iter()
            .map(ProductSummaryView::from)
            .collect();
        Ok(summaries.with_content(content))
    }
}
