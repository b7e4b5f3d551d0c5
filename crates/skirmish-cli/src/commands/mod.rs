//! CLI command definitions and dispatch.

pub mod history;
pub mod migrate;
pub mod simulate;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use skirmish_core::config::AppConfig;
use skirmish_core::error::AppError;

/// Skirmish: turn-based battles against a scripted opponent
#[derive(Debug, Parser)]
#[command(name = "skirmish", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay to merge from `config/{env}`
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Mint a developer access token
    Token(token::TokenArgs),
    /// List a player's finished battles
    History(history::HistoryArgs),
    /// Play a battle locally with random actions
    Simulate(simulate::SimulateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;

        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Token(args) => token::execute(args, &config, self.format),
            Commands::History(args) => history::execute(args, &config, self.format).await,
            Commands::Simulate(args) => simulate::execute(args, &config, self.format).await,
        }
    }
}
