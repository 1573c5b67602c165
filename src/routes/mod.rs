//! Route definitions for the ad swap API.

pub mod health;
pub mod products;
pub mod stats;
pub mod swaps;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Mount point of the JSON API.
pub const API_PREFIX: &str = "/api/adswap";

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    let product_routes = Router::new()
        .route("/products/feed", get(products::feed))
        .route("/products/mine", get(products::mine).post(products::create))
        .route("/products/{id}", put(products::update));

    let swap_routes = Router::new()
        .route("/swaps", get(swaps::list).post(swaps::create))
        .route("/swaps/confirm", post(swaps::confirm));

    let api = Router::new()
        .merge(product_routes)
        .merge(swap_routes)
        .route("/stats", get(stats::stats));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => base.allow_origin(origin).allow_credentials(true),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, allowing any origin");
            base.allow_origin(Any)
        }
    }
}
