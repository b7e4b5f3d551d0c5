//! Battle history listing.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use skirmish_core::config::AppConfig;
use skirmish_core::error::AppError;
use skirmish_core::types::PlayerId;

/// Arguments for the history command
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Player whose battles to list
    #[arg(long)]
    pub player: Uuid,

    /// Maximum number of battles (capped at `battle.history_limit`)
    #[arg(long)]
    pub limit: Option<u32>,
}

/// History display row
#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    /// Battle ID
    id: String,
    /// Final status
    status: String,
    /// Winner
    winner: String,
    /// Player health
    player: i32,
    /// Opponent health
    opponent: i32,
    /// Time budget
    duration: i32,
    /// Started
    created: String,
}

/// Execute the history command
pub async fn execute(
    args: &HistoryArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = skirmish_database::connect_store(&config.database).await?;
    let limit = config.battle.clamp_history_limit(args.limit);

    let battles = store
        .list_history(PlayerId::from_uuid(args.player), limit)
        .await?;

    let rows: Vec<HistoryRow> = battles
        .iter()
        .map(|b| HistoryRow {
            id: b.id.to_string(),
            status: b.status.to_string(),
            winner: b.winner.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string()),
            player: b.player_health,
            opponent: b.opponent_health,
            duration: b.total_duration,
            created: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
