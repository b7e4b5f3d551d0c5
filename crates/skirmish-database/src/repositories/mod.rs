//! PostgreSQL repository implementations.

pub mod battle;

pub use battle::PgBattleStore;
