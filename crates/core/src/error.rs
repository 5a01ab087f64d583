use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Products listed by the summary query disappeared before enrichment.
    /// The request can be retried.
    #[error("Stale page: {} product(s) vanished between query phases", missing.len())]
    StalePage { missing: Vec<DbId> },

    /// The backing store could not be reached. The request can be retried.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
