//! Database models and DTOs for all domain entities.

pub mod product;
pub mod stats;
pub mod swap;
