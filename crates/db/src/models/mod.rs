//! Row models and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` structs matching the database rows
//! - `Deserialize` DTOs for inserts and updates

pub mod category;
pub mod product;
