//! Battle lifecycle use cases.

pub mod service;

pub use service::BattleService;
