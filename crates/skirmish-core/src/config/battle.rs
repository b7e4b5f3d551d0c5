//! Battle rules and presentation limits.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Battle configuration.
///
/// Duration bounds are enforced by the service layer when a battle is
/// created; the engine itself only rejects non-positive durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Duration used when the client does not ask for one.
    #[serde(default = "default_duration")]
    pub default_duration_seconds: i32,
    /// Shortest duration a client may request.
    #[serde(default = "default_min_duration")]
    pub min_duration_seconds: i32,
    /// Longest duration a client may request.
    #[serde(default = "default_max_duration")]
    pub max_duration_seconds: i32,
    /// Number of most recent log records returned with the active battle.
    #[serde(default = "default_display_log_limit")]
    pub display_log_limit: usize,
    /// Maximum number of finished battles returned by the history view.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
    /// Display name of the scripted opponent used in commentary.
    #[serde(default = "default_opponent_name")]
    pub opponent_name: String,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            default_duration_seconds: default_duration(),
            min_duration_seconds: default_min_duration(),
            max_duration_seconds: default_max_duration(),
            display_log_limit: default_display_log_limit(),
            history_limit: default_history_limit(),
            opponent_name: default_opponent_name(),
        }
    }
}

impl BattleConfig {
    /// Check that the configured bounds are coherent.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_duration_seconds <= 0 {
            return Err(AppError::configuration(
                "battle.min_duration_seconds must be positive",
            ));
        }
        if self.min_duration_seconds > self.max_duration_seconds {
            return Err(AppError::configuration(
                "battle.min_duration_seconds exceeds battle.max_duration_seconds",
            ));
        }
        if !(self.min_duration_seconds..=self.max_duration_seconds)
            .contains(&self.default_duration_seconds)
        {
            return Err(AppError::configuration(
                "battle.default_duration_seconds is outside the configured bounds",
            ));
        }
        if self.history_limit == 0 {
            return Err(AppError::configuration("battle.history_limit must be positive"));
        }
        Ok(())
    }

    /// Resolve a requested duration against the configured default and bounds.
    pub fn resolve_duration(&self, requested: Option<i64>) -> Result<i32, AppError> {
        let Some(seconds) = requested else {
            return Ok(self.default_duration_seconds);
        };

        let min = i64::from(self.min_duration_seconds);
        let max = i64::from(self.max_duration_seconds);
        if seconds < min || seconds > max {
            return Err(AppError::validation(format!(
                "Battle duration must be between {min} and {max} seconds"
            )));
        }
        // Bounded by max_duration_seconds, which is an i32.
        Ok(seconds as i32)
    }

    /// Clamp a requested history page size to `1..=history_limit`.
    pub fn clamp_history_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.history_limit)
            .clamp(1, self.history_limit)
    }
}

fn default_duration() -> i32 {
    60
}

fn default_min_duration() -> i32 {
    30
}

fn default_max_duration() -> i32 {
    300
}

fn default_display_log_limit() -> usize {
    10
}

fn default_history_limit() -> u32 {
    20
}

fn default_opponent_name() -> String {
    "Covid Monster".to_string()
}
