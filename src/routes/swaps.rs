//! Swap routes: list, request, confirm.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use uuid::Uuid;

use super::products::invalid_body;
use crate::errors::{read_fallback, ApiResponse, AppError};
use crate::middleware::session::{MaybeSession, Session};
use crate::models::swap::{ConfirmSwap, CreateSwap, Swap, SwapWithProduct};
use crate::services::swap as swap_service;
use crate::AppState;

/// GET /api/adswap/swaps: the caller's swaps with their products.
pub async fn list(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Json<ApiResponse<Vec<SwapWithProduct>>> {
    let Some(session) = session else {
        return ApiResponse::success(Vec::new());
    };
    let result = swap_service::list_for_user(state.store.as_ref(), &session).await;
    ApiResponse::success(read_fallback("swaps.list", result))
}

/// POST /api/adswap/swaps: request a swap on another user's product.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<CreateSwap>, JsonRejection>,
) -> Result<Json<ApiResponse<Swap>>, AppError> {
    let Json(body) = body.map_err(invalid_body)?;
    let product_id = required_id(body.product_id, "Missing productId", "Product not found")?;

    let swap = swap_service::create(state.store.as_ref(), &session, product_id).await?;
    Ok(ApiResponse::success(swap))
}

/// POST /api/adswap/swaps/confirm: mark a swap completed (either participant).
pub async fn confirm(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<ConfirmSwap>, JsonRejection>,
) -> Result<Json<ApiResponse<Swap>>, AppError> {
    let Json(body) = body.map_err(invalid_body)?;
    let swap_id = required_id(body.swap_id, "Missing swapId", "Swap not found")?;

    let swap = swap_service::confirm(state.store.as_ref(), &session, swap_id).await?;
    Ok(ApiResponse::success(swap))
}

/// Absent or empty ids are a validation error; ids that cannot name a row are not found.
fn required_id(raw: Option<String>, missing: &str, not_found: &str) -> Result<Uuid, AppError> {
    let raw = raw
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::Validation(missing.to_string()))?;
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(not_found.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_id_cases() {
        assert!(matches!(
            required_id(None, "Missing productId", "Product not found"),
            Err(AppError::Validation(ref m)) if m == "Missing productId"
        ));
        assert!(matches!(
            required_id(Some(String::new()), "Missing swapId", "Swap not found"),
            Err(AppError::Validation(_))
        ));
        assert!(required_id(Some("nope".to_string()), "m", "n")
            .unwrap_err()
            .is_not_found());

        let id = Uuid::new_v4();
        assert_eq!(required_id(Some(id.to_string()), "m", "n").unwrap(), id);
    }
}
