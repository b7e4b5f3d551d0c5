//! Battle lifecycle: start, act, tick, and read back.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use skirmish_core::config::BattleConfig;
use skirmish_core::error::AppError;
use skirmish_core::result::AppResult;
use skirmish_core::types::{BattleId, PlayerId};
use skirmish_database::BattleStore;
use skirmish_engine::{ActionOutcome, BattleEngine, TickOutcome, Transition};
use skirmish_entity::battle::{ActionKind, Battle, BattleSummary};

use crate::context::RequestContext;

/// Orchestrates the engine and the battle store for one player at a time.
///
/// Every mutating call runs under the caller's lock, so a player's load,
/// transition and save never interleave with another of their requests.
/// Different players never contend.
pub struct BattleService {
    store: Arc<dyn BattleStore>,
    engine: Arc<BattleEngine>,
    config: BattleConfig,
    locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for BattleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleService")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .field("locked_players", &self.locks.len())
            .finish()
    }
}

impl BattleService {
    /// Creates a new battle service.
    pub fn new(store: Arc<dyn BattleStore>, engine: Arc<BattleEngine>, config: BattleConfig) -> Self {
        Self {
            store,
            engine,
            config,
            locks: DashMap::new(),
        }
    }

    /// The battle settings in effect.
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    fn owner_lock(&self, player_id: PlayerId) -> Arc<Mutex<()>> {
        self.locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn require_active(&self, player_id: PlayerId) -> AppResult<Battle> {
        self.store
            .load_active(player_id)
            .await?
            .ok_or_else(|| AppError::not_active("No active battle"))
    }

    /// Starts a new battle for the caller.
    ///
    /// `duration_seconds` falls back to the configured default and must lie
    /// within the configured bounds. Fails with `Conflict` while the caller
    /// still has an active battle.
    pub async fn start_battle(
        &self,
        ctx: &RequestContext,
        duration_seconds: Option<i64>,
    ) -> AppResult<Battle> {
        let duration = self.config.resolve_duration(duration_seconds)?;

        let lock = self.owner_lock(ctx.player_id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.store.load_active(ctx.player_id).await? {
            warn!(
                player_id = %ctx.player_id,
                battle_id = %existing.id,
                "Battle start rejected: an active battle already exists"
            );
            return Err(AppError::conflict(format!(
                "Battle {} is still active",
                existing.id
            )));
        }

        let battle = self
            .engine
            .create_battle(ctx.player_id, duration, ctx.request_time)?;
        let battle = self.store.insert(&battle).await?;

        info!(
            player_id = %ctx.player_id,
            username = %ctx.username,
            battle_id = %battle.id,
            duration = battle.total_duration,
            "Battle started"
        );

        Ok(battle)
    }

    /// The caller's active battle, if any.
    pub async fn active_battle(&self, ctx: &RequestContext) -> AppResult<Option<Battle>> {
        self.store.load_active(ctx.player_id).await
    }

    /// Applies one action to the caller's active battle.
    ///
    /// Fails with `SessionNotActive` when there is no active battle or its
    /// clock has run out.
    pub async fn perform(
        &self,
        ctx: &RequestContext,
        kind: ActionKind,
    ) -> AppResult<Transition<ActionOutcome>> {
        let lock = self.owner_lock(ctx.player_id);
        let _guard = lock.lock().await;

        let battle = self.require_active(ctx.player_id).await?;
        let Transition { battle, outcome } =
            self.engine.apply_action(&battle, kind, ctx.request_time)?;
        let battle = self.store.save(&battle).await?;

        debug!(
            battle_id = %battle.id,
            action = %kind,
            player_delta = outcome.player_delta,
            opponent_delta = outcome.opponent_delta,
            player_health = outcome.player_health,
            opponent_health = outcome.opponent_health,
            "Action applied"
        );
        if outcome.is_final() {
            info!(
                battle_id = %battle.id,
                player_id = %ctx.player_id,
                status = %battle.status,
                winner = ?battle.winner,
                "Battle finished"
            );
        }

        Ok(Transition { battle, outcome })
    }

    /// Advances the caller's battle clock by one second.
    pub async fn tick(&self, ctx: &RequestContext) -> AppResult<Transition<TickOutcome>> {
        let lock = self.owner_lock(ctx.player_id);
        let _guard = lock.lock().await;

        let battle = self.require_active(ctx.player_id).await?;
        let Transition { battle, outcome } = self.engine.tick(&battle, ctx.request_time)?;
        let battle = self.store.save(&battle).await?;

        debug!(
            battle_id = %battle.id,
            time_remaining = outcome.time_remaining,
            "Clock ticked"
        );
        if outcome.expired() {
            info!(
                battle_id = %battle.id,
                player_id = %ctx.player_id,
                winner = ?battle.winner,
                "Battle ran out of time"
            );
        }

        Ok(Transition { battle, outcome })
    }

    /// The caller's finished battles, newest first.
    ///
    /// `limit` is clamped to the configured history limit.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        limit: Option<u32>,
    ) -> AppResult<Vec<BattleSummary>> {
        let limit = self.config.clamp_history_limit(limit);
        let battles = self.store.list_history(ctx.player_id, limit).await?;
        Ok(battles.iter().map(Battle::summary).collect())
    }

    /// One of the caller's battles by id.
    ///
    /// Battles owned by someone else are reported as missing.
    pub async fn get_battle(&self, ctx: &RequestContext, id: BattleId) -> AppResult<Battle> {
        let battle = self.store.load(id).await?;
        if battle.owner_id != ctx.player_id {
            debug!(battle_id = %id, player_id = %ctx.player_id, "Foreign battle requested");
            return Err(AppError::not_found(format!("Battle {id} not found")));
        }
        Ok(battle)
    }
}
