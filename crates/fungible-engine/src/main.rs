//! Headless engine binary for the Fungible swarm simulation.
//!
//! Wires the swarm, the flat arena, and a scripted player together and
//! runs one session until the player dies or the tick limit is reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$FUNGIBLE_CONFIG` or `fungible-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the arena, the player, and the swarm
//! 4. Run the session loop
//! 5. Log the summary and the final snapshot

mod error;
mod report;

use std::path::{Path, PathBuf};

use chrono::Utc;
use fungible_core::{FlatArena, ScriptedPlayer, SimulationConfig, SwarmSimulation, runner};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::ProgressLogger;

/// Environment variable that overrides the config file location.
const CONFIG_ENV: &str = "FUNGIBLE_CONFIG";

/// Config file looked up in the working directory by default.
const DEFAULT_CONFIG_PATH: &str = "fungible-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the session fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so report the source
    //    once it is.
    let config_path = config_path();
    let (config, loaded_from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    init_tracing(&config);
    info!("fungible-engine starting");
    if loaded_from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_dt = config.session.tick_dt,
        max_ticks = config.session.max_ticks,
        base_spawn_rate = config.population.base_spawn_rate,
        "Simulation parameters"
    );

    // 3. Build the world.
    let mut arena = FlatArena::new(&config.arena);
    let mut player = ScriptedPlayer::from_config(&config.session);
    let mut sim = SwarmSimulation::new(&config).map_err(EngineError::from)?;
    info!(run_id = %sim.state().run_id, "Swarm initialized");

    // 4. Run the session.
    let started_at = Utc::now();
    let mut callback = ProgressLogger::new(config.logging.snapshot_interval_ticks);
    let result = runner::run_session(
        &mut sim,
        &mut player,
        &mut arena,
        &config.session,
        &mut callback,
    )
    .map_err(EngineError::from)?;
    let wall_clock = Utc::now().signed_duration_since(started_at);

    // 5. Log results.
    report::log_summary(&result);
    info!(
        player_health = player.health(),
        damage_taken = player.damage_taken(),
        wall_clock_ms = wall_clock.num_milliseconds(),
        started_at = %started_at.to_rfc3339(),
        "fungible-engine shutdown complete"
    );
    if let Some(snapshot) = &result.final_snapshot {
        let json = serde_json::to_string(snapshot).map_err(EngineError::from)?;
        debug!(snapshot = %json, "Final snapshot");
    }

    Ok(())
}

/// Resolve the config file location from the environment.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the simulation configuration, falling back to defaults when the
/// file does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}

fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
