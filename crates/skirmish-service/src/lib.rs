//! # skirmish-service
//!
//! Use cases for the battle API. [`BattleService`] loads the caller's
//! battle from the store, runs it through the engine and saves the result,
//! holding a per-player lock for the whole read-modify-write.

pub mod battle;
pub mod context;

pub use battle::BattleService;
pub use context::RequestContext;
