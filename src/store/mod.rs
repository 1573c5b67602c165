//! Persistence port for products, swaps and credits.
//!
//! Every method is one independent statement against the backing store;
//! nothing here spans a transaction. Adapters map their failures into
//! [`StoreError`] so the services can decide how each one surfaces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::models::product::{NewProduct, Product, ProductScope, UpdateProduct};
use crate::models::swap::{NewSwap, Swap, SwapStatus};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, IO, TLS).
    #[error("store connection failed: {message}")]
    Connection { message: String },

    /// The statement reached the store and was rejected, or matched no row.
    #[error("store query failed: {message}")]
    Query { message: String },

    /// The referenced table does not exist.
    #[error("relation {relation} does not exist")]
    MissingRelation { relation: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Connection {
                message: err.to_string(),
            },
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("42P01") => {
                StoreError::MissingRelation {
                    relation: db_err.table().unwrap_or("unknown").to_string(),
                }
            }
            _ => StoreError::Query {
                message: err.to_string(),
            },
        }
    }
}

#[async_trait]
pub trait AdSwapStore: fmt::Debug + Send + Sync {
    /// Products on one side of the ownership filter, newest first.
    async fn list_products(
        &self,
        user_id: &str,
        scope: ProductScope,
    ) -> Result<Vec<Product>, StoreError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Products whose id is in `ids`, in no particular order.
    async fn products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError>;

    async fn insert_product(&self, product: &NewProduct) -> Result<Product, StoreError>;

    async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> Result<Product, StoreError>;

    /// Swaps where `user_id` is requester or target, newest first.
    async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, StoreError>;

    async fn find_swap(&self, id: Uuid) -> Result<Option<Swap>, StoreError>;

    async fn insert_swap(&self, swap: &NewSwap) -> Result<Swap, StoreError>;

    /// Mark a swap completed at `completed_at`, whatever its current status.
    async fn complete_swap(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Swap, StoreError>;

    /// Count swaps with `status` where `user_id` is requester or target.
    async fn count_swaps(&self, user_id: &str, status: SwapStatus) -> Result<i64, StoreError>;

    /// Credit balance for `user_id`, `None` when the user has no row.
    async fn find_credits(&self, user_id: &str) -> Result<Option<i64>, StoreError>;

    /// Connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
