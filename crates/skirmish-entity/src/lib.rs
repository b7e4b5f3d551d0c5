//! # skirmish-entity
//!
//! Domain entity models for Skirmish. Every struct in this crate is either
//! a persisted record or a value object derived from one. All entities
//! derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod battle;
