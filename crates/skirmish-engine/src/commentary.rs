//! Narration for the action log.

use skirmish_entity::battle::ActionKind;

/// Builds the commentary lines attached to each action record.
#[derive(Debug, Clone)]
pub struct Commentator {
    opponent_name: String,
}

impl Commentator {
    /// Create a commentator that refers to the opponent by `opponent_name`.
    pub fn new(opponent_name: impl Into<String>) -> Self {
        Self {
            opponent_name: opponent_name.into(),
        }
    }

    /// The opponent's display name.
    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    /// Narrate a typed action.
    pub fn narrate_action(
        &self,
        kind: ActionKind,
        player_delta: i32,
        opponent_delta: i32,
        player_health: i32,
        opponent_health: i32,
    ) -> Vec<String> {
        self.narrate(
            kind.as_str(),
            player_delta,
            opponent_delta,
            player_health,
            opponent_health,
        )
    }

    /// Narrate an action given by name.
    ///
    /// Unrecognised names produce a single generic `Action: <kind>` line
    /// instead of an error. Surrender ignores the numbers.
    pub fn narrate(
        &self,
        kind: &str,
        player_delta: i32,
        opponent_delta: i32,
        player_health: i32,
        opponent_health: i32,
    ) -> Vec<String> {
        let Ok(parsed) = kind.parse::<ActionKind>() else {
            return vec![format!("Action: {kind}")];
        };

        let foe = &self.opponent_name;
        match parsed {
            ActionKind::Attack => vec![
                format!("Player strikes {foe} for {player_delta} damage!"),
                format!("{foe} hits back for {opponent_delta} damage!"),
                format!("Player: {player_health}HP, {foe}: {opponent_health}HP"),
            ],
            ActionKind::PowerAttack => vec![
                format!("POWER ATTACK! Player smashes {foe} for {player_delta} damage!"),
                format!("{foe} answers with a heavy blow for {opponent_delta} damage!"),
                format!("Player: {player_health}HP, {foe}: {opponent_health}HP"),
            ],
            ActionKind::Heal => vec![
                format!("Player drinks a potion and recovers {player_delta} health!"),
                format!("{foe} lashes out during the heal for {opponent_delta} damage!"),
                format!("Player: {player_health}HP, {foe}: {opponent_health}HP"),
            ],
            ActionKind::Surrender => vec![
                format!("Player surrenders! {foe} claims victory!"),
                "The battle ends in defeat. Better luck next time!".to_string(),
            ],
        }
    }
}

impl Default for Commentator {
    fn default() -> Self {
        Self::new("the opponent")
    }
}
