//! # skirmish-database
//!
//! Battle persistence. [`BattleStore`] is the contract the service layer
//! depends on; [`PgBattleStore`] backs it with PostgreSQL and
//! [`MemoryBattleStore`] keeps everything in process memory.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use skirmish_core::config::{DatabaseConfig, StoreProvider};
use skirmish_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::MemoryBattleStore;
pub use repositories::PgBattleStore;
pub use store::BattleStore;

/// Build the configured battle store.
///
/// For PostgreSQL this connects the pool and applies pending migrations.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn BattleStore>> {
    match config.provider {
        StoreProvider::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            migration::run_migrations(pool.pool()).await?;
            Ok(Arc::new(PgBattleStore::new(pool.into_pool())))
        }
        StoreProvider::Memory => {
            info!("Using in-memory battle store; battles will not survive a restart");
            Ok(Arc::new(MemoryBattleStore::new()))
        }
    }
}
