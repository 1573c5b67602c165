//! Shared harness: the real router on an ephemeral port over a chosen store.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use adswap::config::AppConfig;
use adswap::services::session::issue_token;
use adswap::store::AdSwapStore;
use adswap::{routes, AppState};
use tokio::net::TcpListener;

pub const JWT_SECRET: &str = "test-jwt-secret-for-integration-tests-only";

/// Spin up the full Axum app on a random port, returning the base URL and a
/// handle to stop the server.
pub async fn start_server(store: Arc<dyn AdSwapStore>) -> (String, tokio::task::JoinHandle<()>) {
    let state = AppState {
        store,
        config: AppConfig::for_secret(JWT_SECRET),
    };
    let app = routes::router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (base_url, handle)
}

/// Session token for `user_id`, shaped like the auth provider's.
pub fn token(user_id: &str) -> String {
    issue_token(user_id, JWT_SECRET, "authenticated", 900).unwrap()
}
