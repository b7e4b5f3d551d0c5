//! PostgreSQL pool for the battle store.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use skirmish_core::config::DatabaseConfig;
use skirmish_core::error::{AppError, ErrorKind};

/// Connection pool backing [`crate::PgBattleStore`].
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    ///
    /// At least one connection is established before this returns, so a bad
    /// URL or unreachable server fails at startup rather than on the first
    /// battle request.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            store = %config.provider,
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            acquire_timeout_secs = config.connect_timeout_seconds,
            "Opening battle store pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Battle store is unreachable: {e}"),
                    e,
                )
            })?;

        info!(open_connections = pool.size(), "Battle store pool ready");
        Ok(Self { pool })
    }

    /// Borrow the sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Take the sqlx pool.
    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

/// Replace the password in a connection URL with `****`.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}
