//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skirmish_engine::{ActionOutcome, TickOutcome};
use skirmish_entity::battle::{ActionRecord, Battle, BattleStatus, Side};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A battle as rendered to clients.
///
/// Only the most recent log records are included; `log_total` carries the
/// full count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleResponse {
    pub id: Uuid,
    pub status: BattleStatus,
    pub winner: Option<Side>,
    pub total_duration: i32,
    pub time_remaining: i32,
    pub player_health: i32,
    pub opponent_health: i32,
    pub log: Vec<ActionRecord>,
    pub log_total: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BattleResponse {
    /// Render `battle`, keeping at most `log_limit` of its latest records.
    pub fn from_battle(battle: &Battle, log_limit: usize) -> Self {
        Self {
            id: battle.id.into_uuid(),
            status: battle.status,
            winner: battle.winner,
            total_duration: battle.total_duration,
            time_remaining: battle.time_remaining,
            player_health: battle.player_health,
            opponent_health: battle.opponent_health,
            log: battle.recent_log(log_limit).to_vec(),
            log_total: battle.log.len(),
            created_at: battle.created_at,
            completed_at: battle.completed_at,
        }
    }
}

/// Result of `POST /api/battles/active/actions/{kind}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    /// What the action did.
    pub outcome: ActionOutcome,
    /// The battle after the action.
    pub battle: BattleResponse,
}

/// Result of `POST /api/battles/active/tick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickResponse {
    /// What the tick did.
    pub outcome: TickOutcome,
    /// The battle after the tick.
    pub battle: BattleResponse,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when the store answers, `degraded` otherwise.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
}
