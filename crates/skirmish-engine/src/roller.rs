//! Sources of damage rolls.
//!
//! Every roll the engine makes goes through [`DamageRoller`] so tests can
//! pin the outcome of an action. Production wiring uses [`ThreadRoller`],
//! which draws from the unseeded thread-local generator.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest base roll.
pub const MIN_ROLL: i32 = 1;
/// Largest base roll.
pub const MAX_ROLL: i32 = 10;

/// Produces base rolls uniformly distributed over `MIN_ROLL..=MAX_ROLL`.
///
/// Implementations are shared across request tasks, so rolling takes
/// `&self`.
pub trait DamageRoller: Send + Sync {
    /// Draw one base roll.
    fn roll(&self) -> i32;
}

/// Unseeded roller backed by `rand::rng()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRoller;

impl DamageRoller for ThreadRoller {
    fn roll(&self) -> i32 {
        rand::rng().random_range(MIN_ROLL..=MAX_ROLL)
    }
}

/// Deterministic roller for reproducible simulations.
#[derive(Debug)]
pub struct SeededRoller {
    inner: Mutex<StdRng>,
}

impl SeededRoller {
    /// Create a roller whose sequence is fixed by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DamageRoller for SeededRoller {
    fn roll(&self) -> i32 {
        let mut rng = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(MIN_ROLL..=MAX_ROLL)
    }
}

/// Replays a fixed sequence of rolls, in order.
///
/// Values are clamped into the legal range. Once the script runs out every
/// further roll is `MIN_ROLL`.
#[derive(Debug, Default)]
pub struct ScriptedRoller {
    rolls: Mutex<VecDeque<i32>>,
}

impl ScriptedRoller {
    /// Create a roller that yields `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: Mutex::new(
                rolls
                    .into_iter()
                    .map(|r| r.clamp(MIN_ROLL, MAX_ROLL))
                    .collect(),
            ),
        }
    }

    /// Number of rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rolls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl DamageRoller for ScriptedRoller {
    fn roll(&self) -> i32 {
        let mut queue = self.rolls.lock().unwrap_or_else(|e| e.into_inner());
        queue.pop_front().unwrap_or_else(|| {
            tracing::warn!("Scripted roller exhausted, rolling minimum");
            MIN_ROLL
        })
    }
}
