//! Developer access token issuing.

use clap::Args;
use serde::Serialize;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use skirmish_auth::JwtEncoder;
use skirmish_core::config::AppConfig;
use skirmish_core::error::AppError;
use skirmish_core::types::PlayerId;

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Player id to put in the token; a fresh one when omitted
    #[arg(long)]
    pub player: Option<Uuid>,

    /// Username to put in the token
    #[arg(long, default_value = "player")]
    pub username: String,
}

#[derive(Debug, Serialize)]
struct IssuedToken {
    player_id: PlayerId,
    username: String,
    access_token: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

/// Execute the token command
pub fn execute(args: &TokenArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let player_id = args.player.map(PlayerId::from_uuid).unwrap_or_default();
    let (access_token, expires_at) =
        JwtEncoder::new(&config.auth).issue(player_id, &args.username)?;

    let issued = IssuedToken {
        player_id,
        username: args.username.clone(),
        access_token,
        expires_at,
    };

    match format {
        OutputFormat::Json => output::print_item(&issued, format),
        OutputFormat::Table => {
            output::print_kv("Player", &issued.player_id.to_string());
            output::print_kv("Username", &issued.username);
            output::print_kv("Expires", &issued.expires_at.to_rfc3339());
            println!();
            println!("{}", issued.access_token);
        }
    }

    Ok(())
}
