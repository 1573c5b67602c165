//! Business logic services. Every call takes the caller's [`session::Session`] explicitly.

pub mod product;
pub mod session;
pub mod stats;
pub mod swap;
