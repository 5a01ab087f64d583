//! Catalog domain core.
//!
//! Holds the domain types, the error enum, and the pure search pipeline
//! (filter building, pagination, order-preserving merge). Storage is reached
//! only through the traits in [`store`], so this crate has no database
//! dependency.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod merge;
pub mod pagination;
pub mod search;
pub mod store;
pub mod types;
pub mod validation;
