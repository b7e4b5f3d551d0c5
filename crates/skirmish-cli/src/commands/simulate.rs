//! Local battle simulation against the in-memory store.

use std::sync::Arc;

use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::output::{self, OutputFormat};
use skirmish_core::config::AppConfig;
use skirmish_core::error::AppError;
use skirmish_core::types::PlayerId;
use skirmish_database::MemoryBattleStore;
use skirmish_engine::{BattleEngine, Commentator, DamageRoller, SeededRoller, ThreadRoller};
use skirmish_entity::battle::ActionKind;
use skirmish_service::{BattleService, RequestContext};

/// Arguments for the simulate command
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Battle time budget in seconds (configured default when omitted)
    #[arg(long)]
    pub duration: Option<i64>,

    /// Maximum number of player turns; each turn also ticks the clock once
    #[arg(long, default_value_t = 100)]
    pub turns: u32,

    /// Seed for both the action choice and the damage rolls
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Actions the simulated player picks from. Surrender is left out so every
/// run ends by knockout or timeout.
const PLAYABLE: [ActionKind; 3] = [ActionKind::Attack, ActionKind::PowerAttack, ActionKind::Heal];

/// Execute the simulate command
pub async fn execute(
    args: &SimulateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (roller, mut chooser): (Arc<dyn DamageRoller>, StdRng) = match args.seed {
        Some(seed) => (
            Arc::new(SeededRoller::new(seed)),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (Arc::new(ThreadRoller), StdRng::from_os_rng()),
    };

    let engine = BattleEngine::new(
        roller,
        Commentator::new(config.battle.opponent_name.clone()),
    );
    let opponent = engine.commentator().opponent_name().to_string();
    let service = BattleService::new(
        Arc::new(MemoryBattleStore::new()),
        Arc::new(engine),
        config.battle.clone(),
    );

    let ctx = RequestContext::new(PlayerId::new(), "simulator");
    let mut battle = service.start_battle(&ctx, args.duration).await?;
    let verbose = format == OutputFormat::Table;

    if verbose {
        println!(
            "Battle {} started: {}s on the clock against {}",
            battle.id, battle.total_duration, opponent
        );
    }

    for turn in 1..=args.turns {
        if !battle.is_active() {
            break;
        }

        let kind = PLAYABLE[chooser.random_range(0..PLAYABLE.len())];
        let step = service.perform(&ctx, kind).await?;
        if verbose {
            println!("\n[turn {turn}] {kind}");
            for line in &step.outcome.commentary {
                println!("  {line}");
            }
        }
        battle = step.battle;

        if battle.is_active() {
            battle = service.tick(&ctx).await?.battle;
        }
    }

    if verbose {
        println!();
        match battle.winner {
            Some(winner) => output::print_success(&format!(
                "Battle {} after {} actions, winner: {}",
                battle.status,
                battle.log.len(),
                winner
            )),
            None => println!("Turn limit reached with the battle still active."),
        }
        output::print_kv("Player health", &battle.player_health.to_string());
        output::print_kv("Opponent health", &battle.opponent_health.to_string());
        output::print_kv("Time remaining", &format!("{}s", battle.time_remaining));
    } else {
        output::print_item(&battle, format);
    }

    Ok(())
}
