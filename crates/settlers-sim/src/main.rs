//! Settlers setup simulator.
//!
//! Builds a game from the environment, plays the roll-off and the snake-draft
//! setup with a seeded die, and prints the result as JSON.

use rand::rngs::StdRng;
use rand::SeedableRng;
use settlers_core::GameState;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod driver;
mod settings;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = settings::from_env()?;
    info!(players = config.player_count, seed = ?config.seed, "starting setup simulation");

    let mut game = GameState::from_config(&config)?;
    let mut die = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    let summary = driver::run_setup(&mut game, &mut die)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
