//! Persistence contract for battles.

use async_trait::async_trait;

use skirmish_core::result::AppResult;
use skirmish_core::types::{BattleId, PlayerId};
use skirmish_entity::battle::Battle;

/// Storage for battles.
///
/// Implementations guarantee that at most one battle per owner is active
/// and that a save only succeeds against the version it was loaded at.
#[async_trait]
pub trait BattleStore: std::fmt::Debug + Send + Sync + 'static {
    /// The owner's active battle, if any.
    async fn load_active(&self, owner_id: PlayerId) -> AppResult<Option<Battle>>;

    /// Load a battle by id. Fails with `NotFound` for unknown ids.
    async fn load(&self, id: BattleId) -> AppResult<Battle>;

    /// Persist a newly created battle.
    ///
    /// Fails with `Conflict` if the owner already has an active battle.
    async fn insert(&self, battle: &Battle) -> AppResult<Battle>;

    /// Persist a changed battle, returning it with the bumped version.
    ///
    /// Fails with `Conflict` if the stored version no longer matches
    /// `battle.version`, and with `NotFound` if the battle does not exist.
    async fn save(&self, battle: &Battle) -> AppResult<Battle>;

    /// The owner's finished battles, most recently created first.
    async fn list_history(&self, owner_id: PlayerId, limit: u32) -> AppResult<Vec<Battle>>;

    /// Check connectivity with the backing store.
    async fn health_check(&self) -> AppResult<bool>;
}
