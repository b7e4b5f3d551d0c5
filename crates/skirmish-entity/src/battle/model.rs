//! Battle entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skirmish_core::types::{BattleId, PlayerId};

use super::action::ActionRecord;
use super::status::{BattleStatus, Side};

/// Health both combatants start with, and the ceiling for healing.
pub const FULL_HEALTH: i32 = 100;

/// One battle between a player and the scripted opponent.
///
/// A battle is created `Active` and becomes terminal exactly once. Only the
/// engine produces new `Battle` values; persistence stores them as-is apart
/// from bumping `version` on every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    /// Unique battle identifier.
    pub id: BattleId,
    /// The player controlling this battle.
    pub owner_id: PlayerId,
    /// Current lifecycle status.
    pub status: BattleStatus,
    /// Time budget the battle started with, in seconds.
    pub total_duration: i32,
    /// Seconds left on the clock. Never increases.
    pub time_remaining: i32,
    /// Player health in `0..=100`.
    pub player_health: i32,
    /// Opponent health in `0..=100`.
    pub opponent_health: i32,
    /// Set exactly once, when the battle leaves `Active`.
    pub winner: Option<Side>,
    /// Append-only action log in chronological order.
    pub log: Vec<ActionRecord>,
    /// Optimistic concurrency counter maintained by persistence.
    pub version: i64,
    /// When the battle was created.
    pub created_at: DateTime<Utc>,
    /// When the battle reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Battle {
    /// Check whether the battle still accepts actions and ticks.
    pub fn is_active(&self) -> bool {
        self.status == BattleStatus::Active
    }

    /// Check whether the clock has run out.
    pub fn is_out_of_time(&self) -> bool {
        self.time_remaining <= 0
    }

    /// The most recent `limit` log records, oldest first.
    pub fn recent_log(&self, limit: usize) -> &[ActionRecord] {
        let start = self.log.len().saturating_sub(limit);
        &self.log[start..]
    }

    /// Summary fields used by the history view.
    pub fn summary(&self) -> BattleSummary {
        BattleSummary {
            id: self.id,
            status: self.status,
            winner: self.winner,
            total_duration: self.total_duration,
            player_health: self.player_health,
            opponent_health: self.opponent_health,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }
}

/// Summary of a finished battle, without its log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSummary {
    /// Battle identifier.
    pub id: BattleId,
    /// Terminal status.
    pub status: BattleStatus,
    /// Who won.
    pub winner: Option<Side>,
    /// Time budget the battle started with.
    pub total_duration: i32,
    /// Final player health.
    pub player_health: i32,
    /// Final opponent health.
    pub opponent_health: i32,
    /// When the battle was created.
    pub created_at: DateTime<Utc>,
    /// When the battle ended.
    pub completed_at: Option<DateTime<Utc>>,
}
