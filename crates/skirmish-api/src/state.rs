//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use skirmish_auth::JwtDecoder;
use skirmish_core::config::AppConfig;
use skirmish_database::BattleStore;
use skirmish_service::BattleService;

/// Shared dependencies handed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Battle store, used directly only by the health check.
    pub store: Arc<dyn BattleStore>,
    /// Access token validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Battle use cases.
    pub battle_service: Arc<BattleService>,
    /// When the process started serving.
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state, stamping the start time.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn BattleStore>,
        jwt_decoder: Arc<JwtDecoder>,
        battle_service: Arc<BattleService>,
    ) -> Self {
        Self {
            config,
            store,
            jwt_decoder,
            battle_service,
            started_at: Instant::now(),
        }
    }

    /// How many battle log records a response may include.
    pub fn display_log_limit(&self) -> usize {
        self.config.battle.display_log_limit
    }
}
