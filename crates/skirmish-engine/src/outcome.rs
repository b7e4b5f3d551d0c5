//! Effect descriptions returned alongside each transition.

use serde::{Deserialize, Serialize};

use skirmish_entity::battle::{ActionKind, BattleStatus, Side};

/// What a single applied action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The applied action.
    pub kind: ActionKind,
    /// Damage dealt by the player, or health restored for a heal.
    pub player_delta: i32,
    /// Damage dealt by the opponent.
    pub opponent_delta: i32,
    /// Player health after the action.
    pub player_health: i32,
    /// Opponent health after the action.
    pub opponent_health: i32,
    /// Narration appended to the log.
    pub commentary: Vec<String>,
    /// Battle status after the action.
    pub status: BattleStatus,
    /// Winner, if the action ended the battle.
    pub winner: Option<Side>,
}

impl ActionOutcome {
    /// Whether this action ended the battle.
    pub fn is_final(&self) -> bool {
        self.status.is_terminal()
    }
}

/// What a single timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// Seconds left after the tick.
    pub time_remaining: i32,
    /// Battle status after the tick.
    pub status: BattleStatus,
    /// Winner, if the clock ran out.
    pub winner: Option<Side>,
}

impl TickOutcome {
    /// Whether this tick ran the clock out.
    pub fn expired(&self) -> bool {
        self.status.is_terminal()
    }
}
