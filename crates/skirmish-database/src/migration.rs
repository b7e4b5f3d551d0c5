//! Embedded battle schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use skirmish_core::error::{AppError, ErrorKind};

/// Migrations compiled in from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Highest schema version this build knows about.
pub fn latest_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}

/// Bring the battle schema up to date.
///
/// Returns the number of migrations embedded in this build; versions that
/// were applied earlier are skipped by sqlx.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, AppError> {
    let available = MIGRATOR.iter().count();
    info!(
        available,
        latest_version = ?latest_version(),
        "Applying battle schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Battle schema migration failed: {e}"),
            e,
        )
    })?;

    info!(available, "Battle schema is up to date");
    Ok(available)
}
