//! Skirmish server: turn-based battles over HTTP.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use skirmish_api::{AppState, build_app};
use skirmish_auth::JwtDecoder;
use skirmish_core::config::AppConfig;
use skirmish_core::error::AppError;
use skirmish_engine::{BattleEngine, Commentator};
use skirmish_service::BattleService;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("SKIRMISH_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("SKIRMISH_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.database.provider,
        "Starting Skirmish"
    );

    let store = skirmish_database::connect_store(&config.database).await?;

    let engine = Arc::new(BattleEngine::with_thread_roller(Commentator::new(
        config.battle.opponent_name.clone(),
    )));
    let battle_service = Arc::new(BattleService::new(
        Arc::clone(&store),
        engine,
        config.battle.clone(),
    ));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let addr = config.server.bind_address();
    let state = AppState::new(Arc::new(config), store, jwt_decoder, battle_service);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "Skirmish server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
