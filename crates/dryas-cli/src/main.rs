//! Younger Dryas scripted runner.
//!
//! Usage: `dryas [SCRIPT]`. Reads commands from SCRIPT, or stdin when absent,
//! applies them to a fresh game and prints the resulting log lines followed by
//! a JSON snapshot of the final state.

use anyhow::Context;
use dryas_core::GameConfig;
use std::io::Read;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod session;

use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;

    let script = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read script {}", path))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read script from stdin")?;
            text
        }
    };

    info!("Starting Younger Dryas session...");

    let mut session = Session::new(&config)?;
    for line in session.run_script(&script) {
        println!("{}", line);
    }

    let snapshot = serde_json::to_string_pretty(&session.game().to_json())?;
    println!("{}", snapshot);

    Ok(())
}

/// Config from `DRYAS_CONFIG` (defaults when unset), with `DRYAS_SEED` applied on top
fn load_config() -> anyhow::Result<GameConfig> {
    let mut config = match std::env::var("DRYAS_CONFIG") {
        Ok(path) => GameConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path))?,
        Err(_) => GameConfig::default(),
    };

    if let Ok(seed) = std::env::var("DRYAS_SEED") {
        let seed: u32 = seed
            .parse()
            .with_context(|| format!("DRYAS_SEED must be an unsigned integer, got {}", seed))?;
        config.world.noise.seed = Some(seed);
    }

    Ok(config)
}
