//! Per-user swap counters and credit balance.

use serde::{Deserialize, Serialize};

/// Response body of `GET /stats`. Served bare, outside the `data` envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub completed: i64,
    pub pending: i64,
    pub credits: i64,
}
