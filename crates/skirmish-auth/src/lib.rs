//! # skirmish-auth
//!
//! Player identity for the battle API. Access tokens are HS256 JWTs whose
//! subject is the player id; account management lives elsewhere.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
