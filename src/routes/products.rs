//! Product routes: feed, my products, create, update.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{read_fallback, ApiResponse, AppError};
use crate::middleware::session::{MaybeSession, Session};
use crate::models::product::{CreateProduct, Product, ProductScope, UpdateProduct};
use crate::services::product as product_service;
use crate::AppState;

async fn list_scoped(
    state: &AppState,
    session: Option<Session>,
    scope: ProductScope,
    endpoint: &'static str,
) -> Json<ApiResponse<Vec<Product>>> {
    let Some(session) = session else {
        return ApiResponse::success(Vec::new());
    };
    let result = product_service::list(state.store.as_ref(), &session, scope).await;
    ApiResponse::success(read_fallback(endpoint, result))
}

/// GET /api/adswap/products/feed: other users' products; empty without a session.
pub async fn feed(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Json<ApiResponse<Vec<Product>>> {
    list_scoped(&state, session, ProductScope::Feed, "products.feed").await
}

/// GET /api/adswap/products/mine: the caller's products; empty without a session.
pub async fn mine(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Json<ApiResponse<Vec<Product>>> {
    list_scoped(&state, session, ProductScope::Mine, "products.mine").await
}

/// POST /api/adswap/products/mine: create a product owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let Json(body) = body.map_err(invalid_body)?;
    let product = product_service::create(state.store.as_ref(), &session, body).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /api/adswap/products/{id}: owner-only partial update.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    body: Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("Missing id".to_string()));
    }
    let Json(body) = body.map_err(invalid_body)?;
    // An id that cannot exist is reported like any other unknown product.
    let id: Uuid = id
        .parse()
        .map_err(|_| AppError::NotFound("Not found".to_string()))?;

    let product = product_service::update(state.store.as_ref(), &session, id, &body).await?;
    Ok(ApiResponse::success(product))
}

pub(crate) fn invalid_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected request body");
    AppError::Validation("Invalid request body".to_string())
}
