//! Player actions and the immutable log records they produce.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An action the player can take on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Both sides strike with a base roll.
    Attack,
    /// Both sides strike with a base roll plus five.
    PowerAttack,
    /// The player restores health and takes a counter hit.
    Heal,
    /// The player gives up; the opponent wins.
    Surrender,
}

impl ActionKind {
    /// All action kinds in display order.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Attack,
        ActionKind::PowerAttack,
        ActionKind::Heal,
        ActionKind::Surrender,
    ];

    /// Return the kind as its canonical snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::PowerAttack => "power_attack",
            Self::Heal => "heal",
            Self::Surrender => "surrender",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    /// Accepts the canonical snake_case names plus the kebab-case
    /// `power-attack` used in URL paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attack" => Ok(Self::Attack),
            "power_attack" | "power-attack" => Ok(Self::PowerAttack),
            "heal" => Ok(Self::Heal),
            "surrender" => Ok(Self::Surrender),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// One entry of a battle's append-only log.
///
/// Records are never mutated after being appended. The health snapshot is
/// redundant with the battle state at that point and is kept for replaying
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The action that was applied.
    pub kind: ActionKind,
    /// Magnitude of the player's effect: damage dealt, or health restored
    /// for a heal.
    pub player_delta: i32,
    /// Damage the opponent dealt to the player.
    pub opponent_delta: i32,
    /// Player health after the action.
    pub player_health_after: i32,
    /// Opponent health after the action.
    pub opponent_health_after: i32,
    /// Human-readable narration of the action.
    pub commentary: Vec<String>,
    /// When the action was applied.
    pub timestamp: DateTime<Utc>,
}
