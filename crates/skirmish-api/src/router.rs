//! Route definitions for the Skirmish HTTP API.
//!
//! All routes are mounted under `/api`. Static segments such as
//! `/battles/active` take precedence over `/battles/{id}`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(battle_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Battle lifecycle and history
fn battle_routes() -> Router<AppState> {
    Router::new()
        .route("/battles", post(handlers::battle::create_battle))
        .route("/battles/active", get(handlers::battle::get_active))
        .route(
            "/battles/active/actions/{kind}",
            post(handlers::battle::perform_action),
        )
        .route("/battles/active/tick", post(handlers::battle::tick))
        .route("/battles/history", get(handlers::battle::history))
        .route("/battles/{id}", get(handlers::battle::get_battle))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
