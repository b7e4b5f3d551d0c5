//! Action resolvers and win-condition checks.
//!
//! Roll order is fixed: the player's roll is drawn before the opponent's,
//! and for a heal the heal roll is drawn before the counter-hit.

use skirmish_entity::battle::{ActionKind, FULL_HEALTH, Side};

use crate::roller::DamageRoller;

/// Bonus added to each roll of a power attack, and to the heal roll.
pub const POWER_BONUS: i32 = 5;

/// Health change produced by one action, before win checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Damage dealt by the player, or health restored for a heal.
    pub player_delta: i32,
    /// Damage dealt by the opponent.
    pub opponent_delta: i32,
    /// Player health after the action, clamped to `0..=100`.
    pub player_health: i32,
    /// Opponent health after the action, clamped to `0..=100`.
    pub opponent_health: i32,
}

/// Apply `kind` to the given healths, drawing rolls from `roller`.
///
/// Surrender draws nothing and leaves both healths unchanged.
pub fn resolve(
    kind: ActionKind,
    player_health: i32,
    opponent_health: i32,
    roller: &dyn DamageRoller,
) -> Resolution {
    match kind {
        ActionKind::Attack => exchange(player_health, opponent_health, 0, roller),
        ActionKind::PowerAttack => exchange(player_health, opponent_health, POWER_BONUS, roller),
        ActionKind::Heal => {
            let heal = roller.roll() + POWER_BONUS;
            let counter = roller.roll();
            let healed = (player_health + heal).min(FULL_HEALTH);
            Resolution {
                player_delta: heal,
                opponent_delta: counter,
                player_health: clamp_health(healed - counter),
                opponent_health,
            }
        }
        ActionKind::Surrender => Resolution {
            player_delta: 0,
            opponent_delta: 0,
            player_health,
            opponent_health,
        },
    }
}

fn exchange(
    player_health: i32,
    opponent_health: i32,
    bonus: i32,
    roller: &dyn DamageRoller,
) -> Resolution {
    let player_damage = roller.roll() + bonus;
    let opponent_damage = roller.roll() + bonus;
    Resolution {
        player_delta: player_damage,
        opponent_delta: opponent_damage,
        player_health: clamp_health(player_health - opponent_damage),
        opponent_health: clamp_health(opponent_health - player_damage),
    }
}

/// Decide whether an action ended the battle.
///
/// The player's health is checked first, so a double knockout goes to the
/// opponent. A heal cannot damage the opponent, so only the player's health
/// is checked for it. Surrender is decided by the engine, not here.
pub fn knockout_winner(kind: ActionKind, player_health: i32, opponent_health: i32) -> Option<Side> {
    if kind == ActionKind::Surrender {
        return None;
    }
    if player_health <= 0 {
        return Some(Side::Opponent);
    }
    if kind != ActionKind::Heal && opponent_health <= 0 {
        return Some(Side::Player);
    }
    None
}

/// Winner when the clock runs out. Ties go to the opponent.
pub fn timeout_winner(player_health: i32, opponent_health: i32) -> Side {
    if player_health > opponent_health {
        Side::Player
    } else {
        Side::Opponent
    }
}

fn clamp_health(value: i32) -> i32 {
    value.clamp(0, FULL_HEALTH)
}
