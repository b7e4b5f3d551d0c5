//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use skirmish_core::config::{AppConfig, StoreProvider};
use skirmish_core::error::AppError;
use skirmish_database::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider != StoreProvider::Postgres {
        return Err(AppError::configuration(format!(
            "Migrations need the postgres provider, configured provider is '{}'",
            config.database.provider
        )));
    }

    match &args.command {
        MigrateCommand::Run => {
            let pool = DatabasePool::connect(&config.database).await?;
            println!("Applying battle schema migrations...");
            let available = skirmish_database::migration::run_migrations(pool.pool()).await?;
            output::print_success(&format!(
                "Battle schema up to date ({available} migrations known to this build)."
            ));
        }
    }

    Ok(())
}
