//! Request handlers organized by domain.

pub mod battle;
pub mod health;
