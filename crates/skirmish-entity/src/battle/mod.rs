//! Battle domain entities.

pub mod action;
pub mod model;
pub mod status;

pub use action::{ActionKind, ActionRecord};
pub use model::{Battle, BattleSummary, FULL_HEALTH};
pub use status::{BattleStatus, Side};
