//! In-process battle store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};

use skirmish_core::error::AppError;
use skirmish_core::result::AppResult;
use skirmish_core::types::{BattleId, PlayerId};
use skirmish_entity::battle::Battle;

use crate::store::BattleStore;

/// Battle store held entirely in memory.
///
/// `active` indexes each owner's active battle. A guard on `battles` is
/// never held while `active` is locked.
#[derive(Debug, Default)]
pub struct MemoryBattleStore {
    battles: DashMap<BattleId, Battle>,
    active: DashMap<PlayerId, BattleId>,
}

impl MemoryBattleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.battles.len()
    }
}

#[async_trait]
impl BattleStore for MemoryBattleStore {
    async fn load_active(&self, owner_id: PlayerId) -> AppResult<Option<Battle>> {
        let id = match self.active.get(&owner_id) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.battles.get(&id).map(|b| b.value().clone()))
    }

    async fn load(&self, id: BattleId) -> AppResult<Battle> {
        self.battles
            .get(&id)
            .map(|b| b.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Battle {id} not found")))
    }

    async fn insert(&self, battle: &Battle) -> AppResult<Battle> {
        if self.battles.contains_key(&battle.id) {
            return Err(AppError::conflict(format!(
                "Battle {} already exists",
                battle.id
            )));
        }

        if battle.is_active() {
            match self.active.entry(battle.owner_id) {
                Entry::Occupied(_) => {
                    warn!(owner_id = %battle.owner_id, "Rejected second active battle");
                    return Err(AppError::conflict("An active battle already exists"));
                }
                Entry::Vacant(slot) => {
                    slot.insert(battle.id);
                }
            }
        }

        self.battles.insert(battle.id, battle.clone());
        debug!(battle_id = %battle.id, owner_id = %battle.owner_id, "Battle inserted");
        Ok(battle.clone())
    }

    async fn save(&self, battle: &Battle) -> AppResult<Battle> {
        let saved = {
            let mut stored = self
                .battles
                .get_mut(&battle.id)
                .ok_or_else(|| AppError::not_found(format!("Battle {} not found", battle.id)))?;

            if stored.version != battle.version {
                warn!(
                    battle_id = %battle.id,
                    stored_version = stored.version,
                    version = battle.version,
                    "Stale battle save rejected"
                );
                return Err(AppError::conflict("Battle was modified concurrently"));
            }

            let mut next = battle.clone();
            next.version += 1;
            *stored = next.clone();
            next
        };

        if !saved.is_active() {
            self.active
                .remove_if(&saved.owner_id, |_, id| *id == saved.id);
        }

        Ok(saved)
    }

    async fn list_history(&self, owner_id: PlayerId, limit: u32) -> AppResult<Vec<Battle>> {
        let mut finished: Vec<Battle> = self
            .battles
            .iter()
            .filter(|b| b.owner_id == owner_id && b.status.is_terminal())
            .map(|b| b.value().clone())
            .collect();

        finished.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        finished.truncate(limit as usize);
        Ok(finished)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
