//! # skirmish-engine
//!
//! The battle session state machine.
//!
//! The engine is synchronous and holds no battle state between calls. Each
//! operation takes the current [`Battle`](skirmish_entity::battle::Battle)
//! by reference and returns the next value together with a description of
//! what happened; persisting the result is the caller's job.
//!
//! - `roller`: injectable source of damage rolls
//! - `rules`: per-action resolvers and win-condition checks
//! - `commentary`: narration templates for the action log
//! - `engine`: create / apply action / tick transitions

pub mod commentary;
pub mod engine;
pub mod outcome;
pub mod roller;
pub mod rules;

pub use commentary::Commentator;
pub use engine::{BattleEngine, Transition};
pub use outcome::{ActionOutcome, TickOutcome};
pub use roller::{DamageRoller, ScriptedRoller, SeededRoller, ThreadRoller};
