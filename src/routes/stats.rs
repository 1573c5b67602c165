//! Stats route: swap counters and credits for the dashboard cards.

use axum::{extract::State, Json};

use crate::errors::read_fallback;
use crate::middleware::session::MaybeSession;
use crate::models::stats::Stats;
use crate::services::stats as stats_service;
use crate::AppState;

/// GET /api/adswap/stats: always 200; zeros without a session or on failure.
pub async fn stats(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Json<Stats> {
    let Some(session) = session else {
        return Json(Stats::default());
    };
    let result = stats_service::get_stats(state.store.as_ref(), &session).await;
    Json(read_fallback("stats", result))
}
