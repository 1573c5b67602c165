//! Swap requests between two users over one target product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::product::Product;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "swap_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Swap {
    pub id: Uuid,
    pub requester_user_id: String,
    pub target_user_id: String,
    pub target_product_id: Uuid,
    pub platform: String,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Swap {
    /// Either side of the swap may act on it.
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.requester_user_id == user_id || self.target_user_id == user_id
    }
}

/// Swap row joined with the product it targets (`null` when that product is gone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapWithProduct {
    #[serde(flatten)]
    pub swap: Swap,
    pub product: Option<Product>,
}

/// A swap ready for insertion; status is always `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSwap {
    pub requester_user_id: String,
    pub target_user_id: String,
    pub target_product_id: Uuid,
    pub platform: String,
}

/// Body of `POST /swaps`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSwap {
    #[serde(rename = "productId", default)]
    pub product_id: Option<String>,
}

/// Body of `POST /swaps/confirm`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfirmSwap {
    #[serde(rename = "swapId", default)]
    pub swap_id: Option<String>,
}
