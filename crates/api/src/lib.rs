//! Catalog API server library.
//!
//! Exposes config, state, error handling, and the router builder so the
//! binary entrypoint and the integration tests share one construction path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
