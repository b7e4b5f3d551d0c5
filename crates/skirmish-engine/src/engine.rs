//! Battle state transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use skirmish_core::error::AppError;
use skirmish_core::result::AppResult;
use skirmish_core::types::{BattleId, PlayerId};
use skirmish_entity::battle::{
    ActionKind, ActionRecord, Battle, BattleStatus, FULL_HEALTH, Side,
};

use crate::commentary::Commentator;
use crate::outcome::{ActionOutcome, TickOutcome};
use crate::roller::{DamageRoller, ThreadRoller};
use crate::rules;

/// The next battle value plus a description of the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<O> {
    /// Battle state after the step.
    pub battle: Battle,
    /// What the step did.
    pub outcome: O,
}

/// Applies the battle rules.
///
/// Holds only the roll source and the commentator; every battle is passed
/// in and a new one handed back.
#[derive(Clone)]
pub struct BattleEngine {
    roller: Arc<dyn DamageRoller>,
    commentator: Commentator,
}

impl std::fmt::Debug for BattleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEngine")
            .field("commentator", &self.commentator)
            .finish()
    }
}

impl BattleEngine {
    /// Create an engine drawing rolls from `roller`.
    pub fn new(roller: Arc<dyn DamageRoller>, commentator: Commentator) -> Self {
        Self {
            roller,
            commentator,
        }
    }

    /// Create an engine with the unseeded production roller.
    pub fn with_thread_roller(commentator: Commentator) -> Self {
        Self::new(Arc::new(ThreadRoller), commentator)
    }

    /// The commentator used for log records.
    pub fn commentator(&self) -> &Commentator {
        &self.commentator
    }

    /// Start a new battle at full health with the whole time budget.
    pub fn create_battle(
        &self,
        owner_id: PlayerId,
        total_duration: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Battle> {
        if total_duration <= 0 {
            return Err(AppError::validation(format!(
                "Battle duration must be positive, got {total_duration}"
            )));
        }

        Ok(Battle {
            id: BattleId::new(),
            owner_id,
            status: BattleStatus::Active,
            total_duration,
            time_remaining: total_duration,
            player_health: FULL_HEALTH,
            opponent_health: FULL_HEALTH,
            winner: None,
            log: Vec::new(),
            version: 0,
            created_at: now,
            completed_at: None,
        })
    }

    /// Apply one player action.
    ///
    /// Fails with `SessionNotActive` if the battle is finished, or if the
    /// clock has run out and the action is not a surrender. On success
    /// exactly one record is appended to the log.
    pub fn apply_action(
        &self,
        battle: &Battle,
        kind: ActionKind,
        now: DateTime<Utc>,
    ) -> AppResult<Transition<ActionOutcome>> {
        if !battle.is_active() {
            return Err(AppError::not_active(format!(
                "Battle {} is already {}",
                battle.id, battle.status
            )));
        }
        if kind != ActionKind::Surrender && battle.is_out_of_time() {
            return Err(AppError::not_active("Battle time has expired"));
        }

        let resolution = rules::resolve(
            kind,
            battle.player_health,
            battle.opponent_health,
            self.roller.as_ref(),
        );

        let mut next = battle.clone();
        next.player_health = resolution.player_health;
        next.opponent_health = resolution.opponent_health;

        let ending = if kind == ActionKind::Surrender {
            Some((BattleStatus::Surrendered, Side::Opponent))
        } else {
            rules::knockout_winner(kind, next.player_health, next.opponent_health)
                .map(|winner| (BattleStatus::Completed, winner))
        };
        if let Some((status, winner)) = ending {
            finish(&mut next, status, winner, now);
        }

        let commentary = self.commentator.narrate_action(
            kind,
            resolution.player_delta,
            resolution.opponent_delta,
            next.player_health,
            next.opponent_health,
        );

        next.log.push(ActionRecord {
            kind,
            player_delta: resolution.player_delta,
            opponent_delta: resolution.opponent_delta,
            player_health_after: next.player_health,
            opponent_health_after: next.opponent_health,
            commentary: commentary.clone(),
            timestamp: now,
        });

        let outcome = ActionOutcome {
            kind,
            player_delta: resolution.player_delta,
            opponent_delta: resolution.opponent_delta,
            player_health: next.player_health,
            opponent_health: next.opponent_health,
            commentary,
            status: next.status,
            winner: next.winner,
        };

        Ok(Transition {
            battle: next,
            outcome,
        })
    }

    /// Advance the clock by one second.
    ///
    /// When the clock reaches zero the battle completes and the healthier
    /// side wins, with ties going to the opponent. Ticks never touch the log.
    pub fn tick(&self, battle: &Battle, now: DateTime<Utc>) -> AppResult<Transition<TickOutcome>> {
        if !battle.is_active() {
            return Err(AppError::not_active(format!(
                "Battle {} is already {}",
                battle.id, battle.status
            )));
        }

        let mut next = battle.clone();
        next.time_remaining = (next.time_remaining - 1).max(0);

        if next.time_remaining == 0 {
            let winner = rules::timeout_winner(next.player_health, next.opponent_health);
            finish(&mut next, BattleStatus::Completed, winner, now);
        }

        let outcome = TickOutcome {
            time_remaining: next.time_remaining,
            status: next.status,
            winner: next.winner,
        };

        Ok(Transition {
            battle: next,
            outcome,
        })
    }
}

fn finish(battle: &mut Battle, status: BattleStatus, winner: Side, now: DateTime<Utc>) {
    battle.status = status;
    battle.winner = Some(winner);
    battle.completed_at = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roller::ScriptedRoller;
    use skirmish_core::error::ErrorKind;

    fn engine_with(rolls: &[i32]) -> (BattleEngine, Arc<ScriptedRoller>) {
        let roller = Arc::new(ScriptedRoller::new(rolls.iter().copied()));
        let engine = BattleEngine::new(roller.clone(), Commentator::new("Goblin"));
        (engine, roller)
    }

    fn fresh(engine: &BattleEngine, duration: i32) -> Battle {
        engine
            .create_battle(PlayerId::new(), duration, Utc::now())
            .expect("create")
    }

    #[test]
    fn test_engine_exposes_its_commentator() {
        let (engine, _) = engine_with(&[]);
        assert_eq!(engine.commentator().opponent_name(), "Goblin");
    }

    #[test]
    fn test_create_starts_full() {
        let (engine, _) = engine_with(&[]);
        let battle = fresh(&engine, 60);
        assert_eq!(battle.status, BattleStatus::Active);
        assert_eq!(battle.player_health, 100);
        assert_eq!(battle.opponent_health, 100);
        assert_eq!(battle.time_remaining, 60);
        assert_eq!(battle.total_duration, 60);
        assert!(battle.log.is_empty());
        assert!(battle.winner.is_none());
        assert!(battle.completed_at.is_none());
    }

    #[test]
    fn test_create_rejects_non_positive_duration() {
        let (engine, _) = engine_with(&[]);
        for duration in [0, -1, -300] {
            let err = engine
                .create_battle(PlayerId::new(), duration, Utc::now())
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }

    #[test]
    fn test_heal_scenario() {
        let (engine, _) = engine_with(&[3, 3]);
        let battle = fresh(&engine, 60);

        let t = engine
            .apply_action(&battle, ActionKind::Heal, Utc::now())
            .expect("heal");

        assert_eq!(t.battle.player_health, 97);
        assert_eq!(t.battle.opponent_health, 100);
        assert_eq!(t.battle.log.len(), 1);
        assert_eq!(t.battle.status, BattleStatus::Active);
        assert_eq!(t.outcome.player_delta, 8);
        assert_eq!(t.outcome.opponent_delta, 3);
        assert!(!t.outcome.is_final());
        // input untouched
        assert!(battle.log.is_empty());
    }

    #[test]
    fn test_lethal_attack_awards_player() {
        let (engine, _) = engine_with(&[6, 1]);
        let mut battle = fresh(&engine, 60);
        battle.opponent_health = 4;

        let now = Utc::now();
        let t = engine
            .apply_action(&battle, ActionKind::Attack, now)
            .expect("attack");

        assert_eq!(t.battle.opponent_health, 0);
        assert_eq!(t.battle.player_health, 99);
        assert_eq!(t.battle.status, BattleStatus::Completed);
        assert_eq!(t.battle.winner, Some(Side::Player));
        assert_eq!(t.battle.completed_at, Some(now));
        assert_eq!(t.battle.log.len(), 1);
        assert!(t.outcome.is_final());
    }

    #[test]
    fn test_double_knockout_awards_opponent() {
        let (engine, _) = engine_with(&[10, 10]);
        let mut battle = fresh(&engine, 60);
        battle.player_health = 5;
        battle.opponent_health = 5;

        let t = engine
            .apply_action(&battle, ActionKind::Attack, Utc::now())
            .expect("attack");

        assert_eq!(t.battle.player_health, 0);
        assert_eq!(t.battle.opponent_health, 0);
        assert_eq!(t.battle.winner, Some(Side::Opponent));
        assert_eq!(t.battle.status, BattleStatus::Completed);
    }

    #[test]
    fn test_lethal_counter_during_heal() {
        let (engine, _) = engine_with(&[1, 10]);
        let mut battle = fresh(&engine, 60);
        battle.player_health = 2;

        let t = engine
            .apply_action(&battle, ActionKind::Heal, Utc::now())
            .expect("heal");

        // 2 + 6 = 8, minus 10 clamps to 0
        assert_eq!(t.battle.player_health, 0);
        assert_eq!(t.battle.winner, Some(Side::Opponent));
    }

    #[test]
    fn test_action_on_completed_battle_is_rejected() {
        let (engine, roller) = engine_with(&[5, 5]);
        let mut battle = fresh(&engine, 60);
        battle.status = BattleStatus::Completed;
        battle.winner = Some(Side::Player);

        for kind in ActionKind::ALL {
            let err = engine.apply_action(&battle, kind, Utc::now()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::SessionNotActive);
        }
        assert!(battle.log.is_empty());
        assert_eq!(roller.remaining(), 2);
    }

    #[test]
    fn test_out_of_time_blocks_all_but_surrender() {
        let (engine, _) = engine_with(&[5, 5]);
        let mut battle = fresh(&engine, 60);
        battle.time_remaining = 0;

        for kind in [ActionKind::Attack, ActionKind::PowerAttack, ActionKind::Heal] {
            let err = engine.apply_action(&battle, kind, Utc::now()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::SessionNotActive);
        }

        let t = engine
            .apply_action(&battle, ActionKind::Surrender, Utc::now())
            .expect("surrender");
        assert_eq!(t.battle.status, BattleStatus::Surrendered);
        assert_eq!(t.battle.winner, Some(Side::Opponent));
    }

    #[test]
    fn test_surrender_keeps_health_and_logs() {
        let (engine, _) = engine_with(&[]);
        let mut battle = fresh(&engine, 60);
        battle.player_health = 80;
        battle.opponent_health = 20;

        let t = engine
            .apply_action(&battle, ActionKind::Surrender, Utc::now())
            .expect("surrender");

        assert_eq!(t.battle.player_health, 80);
        assert_eq!(t.battle.opponent_health, 20);
        assert_eq!(t.battle.log.len(), 1);
        assert_eq!(t.battle.log[0].commentary.len(), 2);
        assert_eq!(t.outcome.player_delta, 0);
        assert!(t.battle.completed_at.is_some());

        let err = engine
            .apply_action(&t.battle, ActionKind::Surrender, Utc::now())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionNotActive);
    }

    #[test]
    fn test_tick_counts_down_silently() {
        let (engine, _) = engine_with(&[]);
        let battle = fresh(&engine, 30);

        let t = engine.tick(&battle, Utc::now()).expect("tick");
        assert_eq!(t.battle.time_remaining, 29);
        assert_eq!(t.battle.status, BattleStatus::Active);
        assert!(t.battle.log.is_empty());
        assert!(!t.outcome.expired());
    }

    #[test]
    fn test_tick_expiry_tie_goes_to_opponent() {
        let (engine, _) = engine_with(&[]);
        let mut battle = fresh(&engine, 30);
        battle.time_remaining = 1;
        battle.player_health = 40;
        battle.opponent_health = 40;

        let t = engine.tick(&battle, Utc::now()).expect("tick");
        assert_eq!(t.battle.time_remaining, 0);
        assert_eq!(t.battle.status, BattleStatus::Completed);
        assert_eq!(t.battle.winner, Some(Side::Opponent));
        assert!(t.battle.completed_at.is_some());
        assert!(t.outcome.expired());
    }

    #[test]
    fn test_tick_expiry_healthier_player_wins() {
        let (engine, _) = engine_with(&[]);
        let mut battle = fresh(&engine, 30);
        battle.time_remaining = 1;
        battle.player_health = 41;
        battle.opponent_health = 40;

        let t = engine.tick(&battle, Utc::now()).expect("tick");
        assert_eq!(t.battle.winner, Some(Side::Player));
    }

    #[test]
    fn test_tick_on_terminal_battle_is_rejected() {
        let (engine, _) = engine_with(&[]);
        let mut battle = fresh(&engine, 30);
        battle.status = BattleStatus::Surrendered;

        let err = engine.tick(&battle, Utc::now()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::SessionNotActive);
    }

    #[test]
    fn test_invariants_hold_over_random_play() {
        let engine = BattleEngine::new(
            Arc::new(crate::roller::SeededRoller::new(99)),
            Commentator::default(),
        );

        for round in 0..50u64 {
            let mut battle = fresh(&engine, 30);
            let mut step = round;
            while battle.is_active() {
                let before_time = battle.time_remaining;
                let before_len = battle.log.len();
                step = step.wrapping_mul(6364136223846793005).wrapping_add(1);

                battle = if step % 4 == 0 {
                    engine.tick(&battle, Utc::now()).expect("tick").battle
                } else {
                    let kind = [ActionKind::Attack, ActionKind::PowerAttack, ActionKind::Heal]
                        [(step % 3) as usize];
                    let next = engine
                        .apply_action(&battle, kind, Utc::now())
                        .expect("action")
                        .battle;
                    assert_eq!(next.log.len(), before_len + 1);
                    next
                };

                assert!((0..=100).contains(&battle.player_health));
                assert!((0..=100).contains(&battle.opponent_health));
                assert!(battle.time_remaining <= before_time);
                assert!(battle.time_remaining >= 0);
            }
            assert!(battle.winner.is_some());
            assert!(battle.completed_at.is_some());
        }
    }
}
