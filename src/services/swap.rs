//! Swap accessor: listing with products, requesting, and confirming.
//!
//! Either participant may confirm, and confirming an already completed swap
//! just stamps a new completion time.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::Product;
use crate::models::swap::{NewSwap, Swap, SwapWithProduct};
use crate::services::session::Session;
use crate::store::AdSwapStore;

/// Swaps the session's user takes part in, newest first, each joined with
/// its target product through one batched secondary lookup.
pub async fn list_for_user(
    store: &dyn AdSwapStore,
    session: &Session,
) -> Result<Vec<SwapWithProduct>, AppError> {
    let swaps = store.swaps_for_user(&session.user_id).await?;
    if swaps.is_empty() {
        return Ok(Vec::new());
    }

    let mut product_ids: Vec<Uuid> = swaps.iter().map(|s| s.target_product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let products: HashMap<Uuid, Product> = store
        .products_by_ids(&product_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(swaps
        .into_iter()
        .map(|swap| SwapWithProduct {
            product: products.get(&swap.target_product_id).cloned(),
            swap,
        })
        .collect())
}

/// Request a swap against another user's product.
pub async fn create(
    store: &dyn AdSwapStore,
    session: &Session,
    product_id: Uuid,
) -> Result<Swap, AppError> {
    let product = store
        .find_product(product_id)
        .await
        .map_err(AppError::on_lookup("Product not found"))?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if product.user_id == session.user_id {
        return Err(AppError::Validation(
            "Cannot request swap on your own product".to_string(),
        ));
    }

    let new_swap = NewSwap {
        requester_user_id: session.user_id.clone(),
        target_user_id: product.user_id,
        target_product_id: product.id,
        platform: product.platform,
    };

    let swap = store
        .insert_swap(&new_swap)
        .await
        .map_err(AppError::on_write("Insert failed"))?;

    tracing::info!(
        swap_id = %swap.id,
        requester = %swap.requester_user_id,
        target = %swap.target_user_id,
        "Swap requested"
    );
    Ok(swap)
}

/// Mark a swap completed on behalf of one of its participants.
pub async fn confirm(
    store: &dyn AdSwapStore,
    session: &Session,
    swap_id: Uuid,
) -> Result<Swap, AppError> {
    let swap = store
        .find_swap(swap_id)
        .await
        .map_err(AppError::on_lookup("Swap not found"))?
        .ok_or_else(|| AppError::NotFound("Swap not found".to_string()))?;

    if !swap.is_participant(&session.user_id) {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }

    let updated = store
        .complete_swap(swap.id, Utc::now())
        .await
        .map_err(AppError::on_write("Update failed"))?;

    tracing::info!(swap_id = %updated.id, confirmed_by = %session.user_id, "Swap confirmed");
    Ok(updated)
}
