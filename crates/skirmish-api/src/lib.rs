//! # skirmish-api
//!
//! HTTP API layer for Skirmish built on Axum.
//!
//! Exposes the battle endpoints under `/api`, the bearer-token extractor,
//! request logging and CORS middleware, DTOs, and the mapping from
//! [`AppError`](skirmish_core::AppError) to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
