//! PostgreSQL battle store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

use skirmish_core::error::{AppError, ErrorKind};
use skirmish_core::result::AppResult;
use skirmish_core::types::{BattleId, PlayerId};
use skirmish_entity::battle::{ActionRecord, Battle, BattleStatus, Side};

use crate::store::BattleStore;

/// Raw `battles` row. Status and winner are stored as text and the log as
/// JSONB.
#[derive(Debug, FromRow)]
struct BattleRow {
    id: BattleId,
    owner_id: PlayerId,
    status: String,
    total_duration: i32,
    time_remaining: i32,
    player_health: i32,
    opponent_health: i32,
    winner: Option<String>,
    log: Json<Vec<ActionRecord>>,
    version: i64,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<BattleRow> for Battle {
    type Error = AppError;

    fn try_from(row: BattleRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BattleStatus>()
            .map_err(AppError::database)?;
        let winner = row
            .winner
            .as_deref()
            .map(str::parse::<Side>)
            .transpose()
            .map_err(AppError::database)?;

        Ok(Battle {
            id: row.id,
            owner_id: row.owner_id,
            status,
            total_duration: row.total_duration,
            time_remaining: row.time_remaining,
            player_health: row.player_health,
            opponent_health: row.opponent_health,
            winner,
            log: row.log.0,
            version: row.version,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

/// Battle store backed by the `battles` table.
///
/// Saves are conditional on `version`, and a partial unique index keeps
/// at most one active battle per owner.
#[derive(Debug, Clone)]
pub struct PgBattleStore {
    pool: PgPool,
}

impl PgBattleStore {
    /// Create a new battle store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: BattleId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM battles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check battle", e))
    }
}

#[async_trait]
impl BattleStore for PgBattleStore {
    async fn load_active(&self, owner_id: PlayerId) -> AppResult<Option<Battle>> {
        let row = sqlx::query_as::<_, BattleRow>(
            "SELECT * FROM battles WHERE owner_id = $1 AND status = 'active' \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active battle", e)
        })?;

        row.map(Battle::try_from).transpose()
    }

    async fn load(&self, id: BattleId) -> AppResult<Battle> {
        sqlx::query_as::<_, BattleRow>("SELECT * FROM battles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find battle", e))?
            .ok_or_else(|| AppError::not_found(format!("Battle {id} not found")))
            .and_then(Battle::try_from)
    }

    async fn insert(&self, battle: &Battle) -> AppResult<Battle> {
        let result = sqlx::query_as::<_, BattleRow>(
            "INSERT INTO battles (id, owner_id, status, total_duration, time_remaining, \
             player_health, opponent_health, winner, log, version, created_at, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(battle.id)
        .bind(battle.owner_id)
        .bind(battle.status.as_str())
        .bind(battle.total_duration)
        .bind(battle.time_remaining)
        .bind(battle.player_health)
        .bind(battle.opponent_health)
        .bind(battle.winner.map(|w| w.as_str()))
        .bind(Json(&battle.log))
        .bind(battle.version)
        .bind(battle.created_at)
        .bind(battle.completed_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                debug!(battle_id = %battle.id, owner_id = %battle.owner_id, "Battle inserted");
                Battle::try_from(row)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                warn!(owner_id = %battle.owner_id, "Rejected second active battle");
                Err(AppError::conflict("An active battle already exists"))
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to create battle",
                e,
            )),
        }
    }

    async fn save(&self, battle: &Battle) -> AppResult<Battle> {
        let row = sqlx::query_as::<_, BattleRow>(
            "UPDATE battles SET status = $3, time_remaining = $4, player_health = $5, \
             opponent_health = $6, winner = $7, log = $8, completed_at = $9, \
             version = version + 1 \
             WHERE id = $1 AND version = $2 RETURNING *",
        )
        .bind(battle.id)
        .bind(battle.version)
        .bind(battle.status.as_str())
        .bind(battle.time_remaining)
        .bind(battle.player_health)
        .bind(battle.opponent_health)
        .bind(battle.winner.map(|w| w.as_str()))
        .bind(Json(&battle.log))
        .bind(battle.completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save battle", e))?;

        match row {
            Some(row) => Battle::try_from(row),
            None if self.exists(battle.id).await? => {
                warn!(
                    battle_id = %battle.id,
                    version = battle.version,
                    "Stale battle save rejected"
                );
                Err(AppError::conflict("Battle was modified concurrently"))
            }
            None => Err(AppError::not_found(format!("Battle {} not found", battle.id))),
        }
    }

    async fn list_history(&self, owner_id: PlayerId, limit: u32) -> AppResult<Vec<Battle>> {
        let rows = sqlx::query_as::<_, BattleRow>(
            "SELECT * FROM battles WHERE owner_id = $1 AND status IN ('completed', 'surrendered') \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(owner_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list battles", e))?;

        rows.into_iter().map(Battle::try_from).collect()
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
