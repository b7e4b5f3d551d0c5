//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/battles`. Every field is optional and an empty body
/// is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBattleRequest {
    /// Time budget in seconds; the configured default when omitted.
    #[serde(default)]
    pub duration_seconds: Option<i64>,
}

/// Query parameters for `GET /api/battles/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of battles to return.
    pub limit: Option<u32>,
}
